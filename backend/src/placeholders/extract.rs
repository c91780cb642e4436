use crate::placeholders::classify::classify;
use common::model::place_holder::PlaceHolder;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

/// `{` up to the next `}`. Nested braces are not supported.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{[^}]+\}").expect("static placeholder pattern"))
}

/// Canonical `{NAME}` form of a raw match, or `None` when nothing is left once
/// braces and whitespace are stripped (e.g. `{ }`).
pub fn normalize(raw: &str) -> Option<String> {
    let name = raw.trim_matches(|c| c == '{' || c == '}').trim();
    if name.is_empty() {
        None
    } else {
        Some(format!("{{{name}}}"))
    }
}

/// Finds every placeholder in `blocks`, deduplicated in first-seen order.
///
/// Blocks are joined with `\n` before scanning. Each result carries every raw
/// spelling that normalized to it so substitution can find `{ NAME }` as well as
/// `{NAME}`.
pub fn extract<S: AsRef<str>>(blocks: &[S]) -> Vec<PlaceHolder> {
    let text = blocks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n");

    let mut found: IndexMap<String, Vec<String>> = IndexMap::new();
    for m in token_pattern().find_iter(&text) {
        let raw = m.as_str();
        let Some(token) = normalize(raw) else {
            continue;
        };
        let spellings = found.entry(token).or_default();
        if !spellings.iter().any(|s| s == raw) {
            spellings.push(raw.to_string());
        }
    }

    found
        .into_iter()
        .map(|(token, spellings)| PlaceHolder {
            name: token[1..token.len() - 1].to_string(),
            field_kind: classify(&token),
            token,
            spellings,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::place_holder::FieldKind;
    use pretty_assertions::assert_eq;

    fn tokens(blocks: &[&str]) -> Vec<String> {
        extract(blocks).into_iter().map(|p| p.token).collect()
    }

    #[test]
    fn deduplicates_in_first_seen_order() {
        assert_eq!(tokens(&["{B} then {A}", "{A} and {B} and {C}"]), vec!["{B}", "{A}", "{C}"]);
    }

    #[test]
    fn trims_interior_whitespace_and_keeps_spellings() {
        let found = extract(&["{ NAME } and {NAME}"]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].token, "{NAME}");
        assert_eq!(found[0].name, "NAME");
        assert_eq!(found[0].spellings, vec!["{ NAME }".to_string(), "{NAME}".to_string()]);
    }

    #[test]
    fn unmatched_and_empty_braces_are_ignored() {
        assert_eq!(tokens(&["{} { } trailing {OPEN"]), Vec::<String>::new());
    }

    #[test]
    fn extraction_is_idempotent() {
        let blocks = ["Dear {CUSTOMER_NAME},", "see {DIAGRAM} and {CUSTOMER_NAME}"];
        assert_eq!(extract(&blocks), extract(&blocks));
    }

    #[test]
    fn punctuation_and_case_are_kept() {
        assert_eq!(tokens(&["{SA-NAME} {City Name}"]), vec!["{SA-NAME}", "{City Name}"]);
    }

    #[test]
    fn every_placeholder_gets_exactly_one_kind() {
        let found = extract(&["{CUSTOMER_NAME} {SCOPE} {SA_EMAIL} {PRICING}"]);
        let kinds: Vec<FieldKind> = found.iter().map(|p| p.field_kind).collect();
        assert_eq!(
            kinds,
            vec![FieldKind::Text, FieldKind::Content, FieldKind::Text, FieldKind::Content]
        );
    }
}
