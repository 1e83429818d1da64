use crate::core::models::{Album, ListState, Photo, PhotoId, SavedPhotoRecord};
use crate::core::navigation::Route;
use crate::core::source::{PhotoSource, SourceError, fetch_blocking};
use crate::core::storage::{PhotoStore, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

pub const DEFAULT_PREVIEW_LIMIT: usize = 3;

#[derive(Error, Debug)]
pub enum StateError {
    /// The in-memory list was updated but the paired store write failed.
    #[error("Saved list is out of sync with storage: {0}")]
    Storage(#[from] StorageError),
}

/// Holds the "all photos" preview and the user's saved photos, keeping the
/// saved list mirrored into the injected store.
pub struct ImageListState<S: PhotoStore, P: PhotoSource> {
    store: Arc<S>,
    source: Arc<P>,
    preview_limit: usize,
    available: watch::Sender<ListState<Photo>>,
    saved: watch::Sender<ListState<Photo>>,
    route: watch::Sender<Route>,
    notice: watch::Sender<Option<String>>,
    /// Held across each saved-list change and its store call, so a reload
    /// can never publish rows that miss a save or delete made meanwhile.
    saved_writes: Mutex<()>,
}

impl<S: PhotoStore, P: PhotoSource> ImageListState<S, P> {
    /// Both lists start out `Loading`; call [`Self::initial_load`] to fill them.
    pub fn new(store: Arc<S>, source: Arc<P>, preview_limit: usize) -> Self {
        Self {
            store,
            source,
            preview_limit,
            available: watch::channel(ListState::Loading).0,
            saved: watch::channel(ListState::Loading).0,
            route: watch::channel(Route::List).0,
            notice: watch::channel(None).0,
            saved_writes: Mutex::new(()),
        }
    }

    pub async fn initial_load(&self) {
        tokio::join!(self.load_available(), self.load_saved());
    }

    // ── Observation ──────────────────────────────────────────

    pub fn available(&self) -> ListState<Photo> {
        self.available.borrow().clone()
    }

    pub fn saved(&self) -> ListState<Photo> {
        self.saved.borrow().clone()
    }

    pub fn subscribe_route(&self) -> watch::Receiver<Route> {
        self.route.subscribe()
    }

    /// Returns and clears the last storage failure message.
    pub fn take_notice(&self) -> Option<String> {
        self.notice.send_replace(None)
    }

    // ── Loading ──────────────────────────────────────────────

    /// Fetches the remote catalog and publishes its first `preview_limit`
    /// photos.  Never leaves the list in `Loading`.
    pub async fn load_available(&self) -> ListState<Photo> {
        self.available.send_replace(ListState::Loading);

        let next = match fetch_blocking(Arc::clone(&self.source), |s| s.fetch_photos()).await {
            Ok(photos) => {
                let total = photos.len();
                let preview: Vec<Photo> = photos.into_iter().take(self.preview_limit).collect();
                debug!(total, shown = preview.len(), "Loaded available photos");
                ListState::loaded(preview)
            }
            Err(e) => {
                error!(source = self.source.name(), "Failed to load photos: {e}");
                ListState::failed(e)
            }
        };

        self.available.send_replace(next.clone());
        next
    }

    pub async fn load_saved(&self) -> ListState<Photo> {
        let _writes = self.saved_writes.lock().await;
        self.saved.send_replace(ListState::Loading);

        let next = match self.store.load_saved().await {
            Ok(records) => {
                debug!(count = records.len(), "Loaded saved photos");
                ListState::loaded(records.into_iter().map(Photo::from).collect())
            }
            Err(e) => {
                error!("Failed to load saved photos: {e}");
                ListState::failed(e)
            }
        };

        self.saved.send_replace(next.clone());
        next
    }

    // ── Mutation ─────────────────────────────────────────────

    /// Adds `photo` to the saved list, replacing an entry with the same id in
    /// place.  The in-memory list is updated even if the store write fails.
    pub async fn save(&self, photo: Photo) -> Result<(), StateError> {
        let record = SavedPhotoRecord::from(&photo);
        let id = photo.id;
        let _writes = self.saved_writes.lock().await;

        self.saved.send_modify(|state| {
            let mut items = take_items(state);
            match items.iter_mut().find(|p| p.id == photo.id) {
                Some(existing) => *existing = photo,
                None => items.push(photo),
            }
            *state = ListState::loaded(items);
        });
        info!(id, "Saved photo");

        let written = self.store.upsert_saved(std::slice::from_ref(&record)).await;
        self.settle(written)
    }

    /// Removes every saved entry with `photo.id` and deletes its row.
    pub async fn delete(&self, photo: &Photo) -> Result<(), StateError> {
        let id = photo.id;
        let _writes = self.saved_writes.lock().await;

        self.saved.send_modify(|state| {
            let mut items = take_items(state);
            items.retain(|p| p.id != id);
            *state = ListState::loaded(items);
        });
        info!(id, "Deleted saved photo");

        let removed = self.store.delete_saved(id).await;
        if let Ok(false) = removed {
            debug!(id, "No stored row to delete");
        }
        self.settle(removed.map(|_| ()))
    }

    fn settle(&self, written: Result<(), StorageError>) -> Result<(), StateError> {
        written.map_err(|e| {
            warn!("Storage write failed after in-memory update: {e}");
            self.notice.send_replace(Some(e.to_string()));
            StateError::from(e)
        })
    }

    // ── Lookup & navigation ──────────────────────────────────

    /// Looks `id` up in the currently loaded preview.  No storage or network
    /// fallback.
    pub fn get_by_id(&self, id: PhotoId) -> Option<Photo> {
        self.available.borrow().find(id).cloned()
    }

    pub fn get_saved_by_id(&self, id: PhotoId) -> Option<Photo> {
        self.saved.borrow().find(id).cloned()
    }

    pub fn view_image(&self, photo: &Photo) -> Route {
        let route = Route::Detail(photo.id);
        self.route.send_replace(route);
        debug!(path = %route.path(), "Navigation requested");
        route
    }

    pub async fn fetch_albums(&self) -> Result<Vec<Album>, SourceError> {
        fetch_blocking(Arc::clone(&self.source), |s| s.fetch_albums()).await
    }
}

/// A list that is not `Loaded` counts as empty.
fn take_items(state: &mut ListState<Photo>) -> Vec<Photo> {
    match std::mem::replace(state, ListState::Loading) {
        ListState::Loaded { items } => items,
        ListState::Loading | ListState::Failed { .. } => Vec::new(),
    }
}
