use crate::core::models::{Album, Photo};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Fetch task failed: {0}")]
    Task(String),
}

/// Remote photo catalog.  Calls block; async callers go through `spawn_blocking`.
pub trait PhotoSource: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn fetch_photos(&self) -> Result<Vec<Photo>, SourceError>;
    fn fetch_albums(&self) -> Result<Vec<Album>, SourceError>;
}

/// Runs a blocking fetch on the blocking pool.  A panicking fetch becomes
/// [`SourceError::Task`] instead of tearing down the caller.
pub async fn fetch_blocking<P, T, F>(source: Arc<P>, fetch: F) -> Result<T, SourceError>
where
    P: PhotoSource,
    T: Send + 'static,
    F: FnOnce(&P) -> Result<T, SourceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || fetch(source.as_ref()))
        .await
        .map_err(|e| SourceError::Task(e.to_string()))?
}
