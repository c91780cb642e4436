use common::model::place_holder::FieldKind;

/// Field names captured as single-line text. Everything else is a content field.
pub const TEXT_ONLY_FIELDS: [&str; 6] = [
    "CUSTOMER_NAME",
    "CITY NAME",
    "SA-NAME",
    "SA_EMAIL",
    "RAX_TEAM",
    "PARTNER_NAME",
];

/// Routes a placeholder (`{NAME}` or bare `NAME`) to its field kind. Exact,
/// case-sensitive match on the name.
pub fn classify(token: &str) -> FieldKind {
    let name = token
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .unwrap_or(token);
    if TEXT_ONLY_FIELDS.contains(&name) {
        FieldKind::Text
    } else {
        FieldKind::Content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_listed_names_are_text() {
        for name in TEXT_ONLY_FIELDS {
            assert_eq!(classify(&format!("{{{name}}}")), FieldKind::Text);
            assert_eq!(classify(name), FieldKind::Text);
        }
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(classify("{customer_name}"), FieldKind::Content);
        assert_eq!(classify("{SA_NAME}"), FieldKind::Content);
        assert_eq!(classify("{ARCHITECTURE_DIAGRAM}"), FieldKind::Content);
    }
}
