//! # Document Generation Service
//!
//! Backend logic for `POST /api/documents/generate`.
//!
//! ## Workflow
//!
//! 1.  **Multipart parsing**: the `json` part becomes a `GenerateRequest` (document
//!     type, customer, template name, typed values). Every other file part is an
//!     upload for the placeholder its field is named after.
//! 2.  **Template lookup**: the registry resolves the template path under a read lock.
//! 3.  **Generation**: on a blocking thread the template is scanned, uploads and typed
//!     values are resolved, and the engine either refuses (some placeholder has no
//!     value) or rewrites the template. Staged images are removed before the thread
//!     returns.
//! 4.  **HTTP Response**: the document bytes, with a
//!     `<customer>_<doc_type>_<YYYYMMDD>.<ext>` attachment filename.

use crate::content::resolver::Upload;
use crate::error::AppError;
use crate::generation::{self, naming, GeneratedDocument, GenerationInput};
use crate::placeholders::extract::normalize;
use crate::services::blocking;
use crate::services::form::read_form;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::requests::GenerateRequest;
use log::{error, info};
use std::collections::HashMap;

/// Actix web handler for `POST /api/documents/generate`.
///
/// # Returns
/// - `200 OK` with the document as an attachment.
/// - `404 Not Found` if the template is not registered.
/// - `422 Unprocessable Entity` listing the placeholders that have no value.
/// - `400 Bad Request` for malformed requests and unreadable or unsupported uploads.
pub async fn process(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let document = match generate_document(&state, payload).await {
        Ok(document) => document,
        Err(e) => {
            error!("Document generation failed: {}", e);
            return Err(e);
        }
    };

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(document.filename.clone())],
    };
    Ok(HttpResponse::Ok()
        .content_type(document.content_type().to_string())
        .insert_header(disposition)
        .body(document.bytes))
}

pub async fn generate_document(
    state: &AppState,
    payload: Multipart,
) -> Result<GeneratedDocument, AppError> {
    let form = read_form(payload, state.max_upload_bytes).await?;
    let request: GenerateRequest = form.metadata()?;

    let mut uploads = HashMap::new();
    for file in form.files {
        let token = normalize(&file.field).ok_or_else(|| {
            AppError::InvalidRequest(format!("file part `{}` does not name a placeholder", file.field))
        })?;
        uploads.insert(
            token,
            Upload {
                filename: file.filename,
                bytes: file.bytes,
            },
        );
    }
    let typed: HashMap<String, String> = request
        .values
        .iter()
        .filter_map(|(key, value)| Some((normalize(key)?, value.clone())))
        .collect();

    let template = state
        .registry
        .read()
        .await
        .resolve(&request.doc_type, &request.template_name)?;
    info!(
        "Generating '{}' / '{}' for '{}' ({} uploads, {} typed values)",
        request.doc_type,
        request.template_name,
        request.customer_name,
        uploads.len(),
        typed.len()
    );

    blocking(move || {
        let input = GenerationInput {
            doc_type: &request.doc_type,
            customer_name: &request.customer_name,
            typed: &typed,
            uploads: &uploads,
            date: naming::today(),
        };
        generation::generate(&template, &input)
    })
    .await
}
