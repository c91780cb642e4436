use chrono::{Local, NaiveDate};
use common::model::template::TemplateKind;

/// `<customer>_<doc type>_<YYYYMMDD>.<ext>`, spaces in the document type replaced by
/// underscores. Path separators in the customer name are replaced too.
pub fn output_filename(
    customer_name: &str,
    doc_type: &str,
    date: NaiveDate,
    kind: TemplateKind,
) -> String {
    let customer = customer_name.trim().replace(['/', '\\'], "_");
    format!(
        "{}_{}_{}.{}",
        customer,
        doc_type.replace(' ', "_"),
        date.format("%Y%m%d"),
        kind.output_extension()
    )
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_output_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            output_filename("Acme", "Statement of Work", date, TemplateKind::WordDocument),
            "Acme_Statement_of_Work_20240307.docx"
        );
    }

    #[test]
    fn slide_output_name_keeps_customer_spaces() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(
            output_filename(" Acme Corp ", "Solution Proposal", date, TemplateKind::SlideDeck),
            "Acme Corp_Solution_Proposal_20251231.pptx"
        );
    }

    #[test]
    fn separators_in_customer_are_replaced() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(
            output_filename("A/B", "X", date, TemplateKind::WordDocument),
            "A_B_X_20250102.docx"
        );
    }
}
