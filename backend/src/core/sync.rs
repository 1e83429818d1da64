use crate::core::models::SavedPhotoRecord;
use crate::core::source::{PhotoSource, SourceError, fetch_blocking};
use crate::core::storage::{PhotoStore, StorageError};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Status of the startup mirror job, as seen by whoever hosts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum JobReport {
    Pending,
    Running,
    Succeeded { count: usize },
    Failed { reason: String },
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("fetch failed: {0}")]
    Source(#[from] SourceError),

    #[error("store failed: {0}")]
    Storage(#[from] StorageError),
}

/// One-shot job that mirrors the whole remote catalog into the store.
pub struct SyncJob<S: PhotoStore, P: PhotoSource> {
    store: Arc<S>,
    source: Arc<P>,
    started: AtomicBool,
    report: watch::Sender<JobReport>,
}

impl<S: PhotoStore, P: PhotoSource> SyncJob<S, P> {
    pub fn new(store: Arc<S>, source: Arc<P>) -> Self {
        Self {
            store,
            source,
            started: AtomicBool::new(false),
            report: watch::channel(JobReport::Pending).0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<JobReport> {
        self.report.subscribe()
    }

    pub fn report(&self) -> JobReport {
        self.report.borrow().clone()
    }

    /// Runs the job the first time it is called.  Later calls only return
    /// the current report.
    pub async fn run(&self) -> JobReport {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("Sync job already started; not running again");
            return self.report();
        }

        self.report.send_replace(JobReport::Running);
        let outcome = match self.mirror().await {
            Ok(count) => {
                info!(count, "Mirrored remote photos into local store");
                JobReport::Succeeded { count }
            }
            Err(e) => {
                error!("Photo sync job failed: {e}");
                JobReport::Failed {
                    reason: e.to_string(),
                }
            }
        };
        self.report.send_replace(outcome.clone());
        outcome
    }

    async fn mirror(&self) -> Result<usize, SyncError> {
        let photos = fetch_blocking(Arc::clone(&self.source), |s| s.fetch_photos()).await?;
        let records: Vec<SavedPhotoRecord> = photos.iter().map(SavedPhotoRecord::from).collect();
        let written = self.store.mirror_photos(&records).await?;
        let total = self.store.mirrored_count().await?;
        debug!(written, total, "Mirror table updated");
        Ok(written)
    }
}
