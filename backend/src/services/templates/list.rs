use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};

/// Actix web handler for `GET /api/templates`.
///
/// Responds with the registry index, document types in their stored order.
pub async fn process(state: web::Data<AppState>) -> impl Responder {
    let registry = state.registry.read().await;
    HttpResponse::Ok().json(registry.index())
}
