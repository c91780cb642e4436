use crate::model::template::TemplateKind;
use serde::{Deserialize, Serialize};

/// How a placeholder is meant to be filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A known single-line field such as `CUSTOMER_NAME`.
    Text,
    /// Anything else: filled by an uploaded file or free text.
    Content,
}

/// A placeholder discovered in a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceHolder {
    /// Canonical token, e.g. `{CUSTOMER_NAME}`.
    pub token: String,
    /// The token without braces, e.g. `CUSTOMER_NAME`.
    pub name: String,
    /// Every raw form seen in the template (`{CUSTOMER_NAME}`, `{ CUSTOMER_NAME }`...),
    /// in first-seen order.
    pub spellings: Vec<String>,
    pub field_kind: FieldKind,
}

/// Result of scanning a template, split the way a form would render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderScan {
    pub kind: TemplateKind,
    pub text_fields: Vec<PlaceHolder>,
    pub content_fields: Vec<PlaceHolder>,
}
