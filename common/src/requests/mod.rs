use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata part of a template upload. Sent as the `json` field before the `file` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveTemplateRequest {
    pub doc_type: String,
    pub display_name: String,
}

/// Metadata part of a generation request. Sent as the `json` field; uploaded
/// content goes in file fields named after the placeholder token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub doc_type: String,
    pub customer_name: String,
    pub template_name: String,
    /// Typed values keyed by canonical token (`{NAME}`).
    #[serde(default)]
    pub values: HashMap<String, String>,
}
