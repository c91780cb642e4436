//! Office Open XML templates: reading their text blocks and rewriting them.
//!
//! - `package`: the zip container, content types and relationships.
//! - `xml`: an owned element tree for individual parts.
//! - `text`: span-aware text replacement inside paragraphs and shapes.
//! - `docx` / `pptx`: the two template kinds.

pub mod docx;
pub mod package;
pub mod pptx;
pub mod text;
pub mod xml;

use common::model::template::TemplateKind;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("not a readable Office package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("malformed XML escape: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),
    #[error("package expands to more than {0} bytes")]
    TooLarge(u64),
    #[error("malformed XML: {0}")]
    Malformed(String),
    #[error("package part `{0}` is missing")]
    MissingPart(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unreadable image: {0}")]
    Image(#[from] image::ImageError),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Template kind from a path's extension.
pub fn template_kind(path: &Path) -> Option<TemplateKind> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(TemplateKind::from_extension)
}

/// Ordered text blocks of a template: paragraphs for Word, text-bearing shapes for
/// slide decks.
pub fn text_blocks(kind: TemplateKind, bytes: &[u8]) -> Result<Vec<String>, DocumentError> {
    match kind {
        TemplateKind::WordDocument => Ok(docx::WordDocument::from_bytes(bytes)?.paragraph_texts()),
        TemplateKind::SlideDeck => Ok(pptx::SlideDeck::from_bytes(bytes)?.shape_texts()),
    }
}
