use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named template file registered under one document type.
///
/// Serialized as `{"name": ..., "file": ...}` in the registry index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    /// Display name, unique within its document-type bucket.
    pub name: String,
    /// Path of the stored template file.
    pub file: String,
}

/// The on-disk shape of the registry: document type -> ordered template entries.
///
/// An `IndexMap` keeps the bucket order stable across load/save cycles.
pub type TemplateIndex = IndexMap<String, Vec<TemplateEntry>>;

/// The two families of template the factory can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    /// Word documents and Word templates (`.dot`, `.dotx`, `.docx`).
    WordDocument,
    /// PowerPoint decks (`.pptx`).
    SlideDeck,
}

impl TemplateKind {
    /// Classifies a file extension (without the dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "dot" | "dotx" | "docx" => Some(Self::WordDocument),
            "pptx" => Some(Self::SlideDeck),
            _ => None,
        }
    }

    /// Extension used for generated documents of this kind.
    pub fn output_extension(self) -> &'static str {
        match self {
            Self::WordDocument => "docx",
            Self::SlideDeck => "pptx",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension_ignores_case() {
        assert_eq!(TemplateKind::from_extension("DOTX"), Some(TemplateKind::WordDocument));
        assert_eq!(TemplateKind::from_extension("dot"), Some(TemplateKind::WordDocument));
        assert_eq!(TemplateKind::from_extension("Pptx"), Some(TemplateKind::SlideDeck));
        assert_eq!(TemplateKind::from_extension("pdf"), None);
    }

    #[test]
    fn entry_uses_name_and_file_keys() {
        let entry = TemplateEntry {
            name: "Default".to_string(),
            file: "templates/Statement_of_Work_Default.dotx".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Default");
        assert_eq!(json["file"], "templates/Statement_of_Work_Default.dotx");
    }
}
