//! # Template Service Module
//!
//! Routes for the template registry under `/api/templates`.
//!
//! ## Sub-modules:
//! - `list`: Returns the whole registry (document types and their templates).
//! - `save`: Registers an uploaded Word or PowerPoint template.
//! - `placeholders`: Scans a registered template and describes the fields to fill.

mod list;
mod placeholders;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: Returns the registry index as a JSON object mapping each
///       document type to its ordered `{name, file}` entries.
///
/// *   **`POST /save`**:
///     - **Handler**: `save::process`
///     - **Description**: Multipart upload. A `json` part carries
///       `{doc_type, display_name}`, a `file` part carries the `.dot`, `.dotx` or
///       `.pptx` template. A template with the same display name in that document
///       type is replaced.
///
/// *   **`GET /{doc_type}/{name}/placeholders`**:
///     - **Handler**: `placeholders::process`
///     - **Description**: Extracts the placeholders of a registered template, split
///       into text fields and content fields.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/{doc_type}/{name}/placeholders", get().to(placeholders::process))
}
