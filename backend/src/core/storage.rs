use crate::core::models::{PhotoId, SavedPhotoRecord};
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data file corruption: {0}")]
    Corruption(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// The Local Store.  One handle is opened at startup and shared explicitly.
pub trait PhotoStore: Send + Sync + 'static {
    fn load_saved(&self)
    -> impl Future<Output = Result<Vec<SavedPhotoRecord>, StorageError>> + Send;

    /// Insert-or-replace; a duplicate id overwrites the existing row.
    fn upsert_saved(
        &self,
        records: &[SavedPhotoRecord],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn delete_saved(&self, id: PhotoId)
    -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Bulk upsert into the background mirror.  Returns the number of rows written.
    fn mirror_photos(
        &self,
        records: &[SavedPhotoRecord],
    ) -> impl Future<Output = Result<usize, StorageError>> + Send;

    fn mirrored_count(&self) -> impl Future<Output = Result<usize, StorageError>> + Send;
}
