pub mod documents;
pub mod form;
pub mod templates;

use crate::error::AppError;

/// Runs blocking document or file work off the async workers.
pub(crate) async fn blocking<F, T>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("worker task failed: {e}")))?
}
