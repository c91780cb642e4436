//! # Template Upload Service
//!
//! Backend logic for `POST /api/templates/save`.
//!
//! 1.  **Multipart parsing**: the `json` part is decoded into a `SaveTemplateRequest`
//!     and the `file` part is buffered in memory.
//! 2.  **Registration**: the registry validates the extension, document type and
//!     display name, writes the file as `<doc_type>_<display_name>.<ext>` and rewrites
//!     `templates_index.json`. Both writes go through a temporary file and a rename.
//! 3.  **Response**: the stored `TemplateEntry` as JSON.
//!
//! The registry write lock is held for the whole save, so concurrent uploads are
//! applied one after the other.

use crate::error::AppError;
use crate::services::blocking;
use crate::services::form::read_form;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::model::template::TemplateEntry;
use common::requests::SaveTemplateRequest;
use log::{error, info};

/// Actix web handler for `POST /api/templates/save`.
///
/// # Returns
/// - `200 OK` with the saved `TemplateEntry`.
/// - `400 Bad Request` for a missing part, an unsupported file type, an unknown
///   document type or an empty display name.
/// - `500 Internal Server Error` if the template or the index cannot be written.
pub async fn process(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    match save_template(&state, payload).await {
        Ok(entry) => Ok(HttpResponse::Ok().json(entry)),
        Err(e) => {
            error!("Template upload rejected: {}", e);
            Err(e)
        }
    }
}

/// Reads the upload and registers it.
pub async fn save_template(
    state: &AppState,
    payload: Multipart,
) -> Result<TemplateEntry, AppError> {
    let mut form = read_form(payload, state.max_upload_bytes).await?;
    let request: SaveTemplateRequest = form.metadata()?;
    let file = form.take_file("file")?;
    info!(
        "Saving template '{}' ({}, {} bytes) under '{}'",
        request.display_name,
        file.filename,
        file.bytes.len(),
        request.doc_type
    );

    let mut registry = state.registry.clone().write_owned().await;
    blocking(move || {
        registry.save(
            &file.bytes,
            &file.filename,
            &request.doc_type,
            &request.display_name,
        )
    })
    .await
}
