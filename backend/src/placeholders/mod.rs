//! Placeholder discovery: find `{NAME}` tokens in a template and decide how each one
//! is filled.

pub mod classify;
pub mod extract;

use crate::documents::{self, DocumentError};
use crate::error::AppError;
use common::model::place_holder::{FieldKind, PlaceHolder, PlaceholderScan};
use common::model::template::TemplateKind;
use log::debug;
use std::path::Path;

/// Splits extracted placeholders into the text-field and content-field lists, each
/// in discovery order.
pub fn scan(kind: TemplateKind, placeholders: Vec<PlaceHolder>) -> PlaceholderScan {
    let (text_fields, content_fields) = placeholders
        .into_iter()
        .partition(|ph| ph.field_kind == FieldKind::Text);
    PlaceholderScan {
        kind,
        text_fields,
        content_fields,
    }
}

/// A template read from disk with the placeholders found in it.
pub struct ScannedTemplate {
    pub kind: TemplateKind,
    pub bytes: Vec<u8>,
    pub placeholders: Vec<PlaceHolder>,
}

impl ScannedTemplate {
    pub fn into_scan(self) -> PlaceholderScan {
        scan(self.kind, self.placeholders)
    }
}

/// Reads the template at `path` and extracts its placeholders.
pub fn scan_template(path: &Path) -> Result<ScannedTemplate, AppError> {
    let kind = documents::template_kind(path)
        .ok_or_else(|| AppError::UnsupportedTemplateType(path.display().to_string()))?;
    let bytes = std::fs::read(path).map_err(DocumentError::from)?;
    let blocks = documents::text_blocks(kind, &bytes)?;
    let placeholders = extract::extract(&blocks);
    debug!(
        "{}: {} text blocks, {} placeholders",
        path.display(),
        blocks.len(),
        placeholders.len()
    );
    Ok(ScannedTemplate {
        kind,
        bytes,
        placeholders,
    })
}
