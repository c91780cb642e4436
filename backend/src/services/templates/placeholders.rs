//! # Placeholder Scan Service
//!
//! `GET /api/templates/{doc_type}/{name}/placeholders` resolves the template through
//! the registry, reads its paragraphs (Word) or shapes (PowerPoint) and returns every
//! `{NAME}` token found, in order of first appearance. Tokens are split the way a form
//! renders them:
//!
//! - `text_fields`: the fixed single-line fields (`CUSTOMER_NAME`, `SA_EMAIL`...).
//! - `content_fields`: everything else, filled by an upload or free text.

use crate::error::AppError;
use crate::placeholders::scan_template;
use crate::services::blocking;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::place_holder::PlaceholderScan;
use log::info;

/// Actix web handler for `GET /api/templates/{doc_type}/{name}/placeholders`.
///
/// # Returns
/// - `200 OK` with a `PlaceholderScan`.
/// - `404 Not Found` if no template of that name is registered.
/// - `500 Internal Server Error` if the template file cannot be read as an Office package.
pub async fn process(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (doc_type, name) = path.into_inner();
    let scan = scan_placeholders(&state, &doc_type, &name).await?;
    Ok(HttpResponse::Ok().json(scan))
}

pub async fn scan_placeholders(
    state: &AppState,
    doc_type: &str,
    name: &str,
) -> Result<PlaceholderScan, AppError> {
    let template = state.registry.read().await.resolve(doc_type, name)?;
    let scan = blocking(move || Ok(scan_template(&template)?.into_scan())).await?;
    info!(
        "Scanned '{}' / '{}': {} text fields, {} content fields",
        doc_type,
        name,
        scan.text_fields.len(),
        scan.content_fields.len()
    );
    Ok(scan)
}
