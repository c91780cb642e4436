//! Shared application state, injected into every handler as `web::Data<AppState>`.

use crate::registry::TemplateRegistry;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    /// Reads (listing, scans, generation) share the lock; saves take it exclusively so
    /// two uploads never interleave their index rewrites.
    pub registry: Arc<RwLock<TemplateRegistry>>,
    /// Largest multipart body accepted, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(registry: TemplateRegistry, max_upload_bytes: usize) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            max_upload_bytes,
        }
    }
}
