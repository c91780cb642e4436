//! Document generation: from a registered template and the user's inputs to the
//! bytes of a finished document.
//!
//! 1. The template is scanned for placeholders ([`crate::placeholders`]).
//! 2. Uploads and typed text are resolved into values ([`crate::content`]).
//! 3. The engine refuses when any placeholder is left without a value, otherwise
//!    rewrites the template ([`engine`]).
//! 4. The result is named after the customer, document type and date ([`naming`]).

pub mod engine;
pub mod naming;
pub mod staging;

use crate::content::resolver::{resolve_all, Upload};
use crate::error::AppError;
use crate::placeholders::scan_template;
use chrono::NaiveDate;
use common::model::template::TemplateKind;
use log::info;
use std::collections::HashMap;
use std::path::Path;

/// What the user supplied for one generation.
pub struct GenerationInput<'a> {
    pub doc_type: &'a str,
    pub customer_name: &'a str,
    /// Typed text keyed by canonical token.
    pub typed: &'a HashMap<String, String>,
    /// Uploaded files keyed by canonical token.
    pub uploads: &'a HashMap<String, Upload>,
    pub date: NaiveDate,
}

pub struct GeneratedDocument {
    pub filename: String,
    pub kind: TemplateKind,
    pub bytes: Vec<u8>,
}

impl GeneratedDocument {
    pub fn content_type(&self) -> mime_guess::Mime {
        mime_guess::from_path(&self.filename).first_or_octet_stream()
    }
}

/// Runs the whole pipeline for the template stored at `template`.
pub fn generate(template: &Path, input: &GenerationInput<'_>) -> Result<GeneratedDocument, AppError> {
    if input.customer_name.trim().is_empty() {
        return Err(AppError::InvalidRequest("customer name must not be empty".into()));
    }

    let scanned = scan_template(template)?;
    let values = resolve_all(&scanned.placeholders, input.uploads, input.typed)?;
    let bytes = engine::fill(scanned.kind, &scanned.bytes, &scanned.placeholders, &values)?;
    let filename = naming::output_filename(input.customer_name, input.doc_type, input.date, scanned.kind);

    info!(
        "Generated {} from {} ({} placeholders)",
        filename,
        template.display(),
        scanned.placeholders.len()
    );
    Ok(GeneratedDocument {
        filename,
        kind: scanned.kind,
        bytes,
    })
}
