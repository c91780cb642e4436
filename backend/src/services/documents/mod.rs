//! # Document Service Module
//!
//! Generation of finished documents from registered templates, under `/api/documents`.

mod generate;

use actix_web::web;

const API_PATH: &str = "/api/documents";

/// Configures and returns the Actix `Scope` for document generation.
///
/// *   **`POST /generate`**: multipart request. The `json` part is a
///     `GenerateRequest`; each file part is named after the placeholder it fills
///     (`{ARCHITECTURE_DIAGRAM}` or `ARCHITECTURE_DIAGRAM`). Responds with the
///     generated `.docx` / `.pptx` as an attachment.
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH).route("/generate", web::post().to(generate::process))
}
