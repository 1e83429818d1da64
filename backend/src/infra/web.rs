use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use crate::core::models::{Photo, PhotoId};
use crate::core::navigation::Route;
use crate::core::render;
use crate::core::source::PhotoSource;
use crate::core::state::ImageListState;
use crate::core::storage::PhotoStore;
use crate::core::sync::JobReport;

// ── App state ────────────────────────────────────────────────

/// Combined state passed to handlers via axum State extractor.
struct AppState<S: PhotoStore, P: PhotoSource> {
    photos: Arc<ImageListState<S, P>>,
    sync: watch::Receiver<JobReport>,
}

// Derived Clone would demand `S: Clone` and `P: Clone`.
impl<S: PhotoStore, P: PhotoSource> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            photos: Arc::clone(&self.photos),
            sync: self.sync.clone(),
        }
    }
}

// ── Server bootstrap ─────────────────────────────────────────

pub async fn start_server<S: PhotoStore, P: PhotoSource>(
    photos: Arc<ImageListState<S, P>>,
    sync: watch::Receiver<JobReport>,
    port: u16,
) -> std::io::Result<()> {
    let app = router(AppState { photos, sync }).layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("mypics listening on http://localhost:{port}");
    axum::serve(listener, app).await
}

fn router<S: PhotoStore, P: PhotoSource>(state: AppState<S, P>) -> Router {
    Router::new()
        // Pages
        .route("/", get(main_page::<S, P>))
        .route("/photos/{id}", get(detail_page::<S, P>))
        .route("/saved/{id}", post(save_form::<S, P>))
        .route("/saved/{id}/delete", post(delete_form::<S, P>))
        // JSON API
        .route("/api/photos", get(list_photos::<S, P>))
        .route("/api/photos/reload", post(reload_photos::<S, P>))
        .route("/api/photos/{id}", get(get_photo::<S, P>))
        .route("/api/photos/{id}/view", post(view_photo::<S, P>))
        .route("/api/saved", get(list_saved::<S, P>).post(save_photo::<S, P>))
        .route("/api/saved/{id}", delete(delete_saved::<S, P>))
        .route("/api/albums", get(list_albums::<S, P>))
        .route("/api/sync", get(sync_status::<S, P>))
        .with_state(state)
}

/// `Err` carries the ready-made 400 response for a malformed id.
fn parse_id(raw: &str) -> Result<PhotoId, Response> {
    Route::parse_detail(raw).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())
}

// ── GET / ────────────────────────────────────────────────────

async fn main_page<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
) -> Html<String> {
    let notice = state.photos.take_notice();
    Html(render::main_page(
        &state.photos.available(),
        &state.photos.saved(),
        notice.as_deref(),
    ))
}

// ── GET /photos/:id ──────────────────────────────────────────

async fn detail_page<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = Route::parse_detail(&id) else {
        return (StatusCode::BAD_REQUEST, Html(render::invalid_id_page())).into_response();
    };
    match state.photos.get_by_id(id) {
        Some(photo) => Html(render::detail_page(Some(&photo))).into_response(),
        None => (StatusCode::NOT_FOUND, Html(render::detail_page(None))).into_response(),
    }
}

// ── POST /saved/:id (form) ───────────────────────────────────

async fn save_form<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(photo) = state.photos.get_by_id(id) else {
        return (StatusCode::NOT_FOUND, Html(render::detail_page(None))).into_response();
    };
    // A storage failure surfaces as the notice banner on the next page load.
    let _ = state.photos.save(photo).await;
    Redirect::to(&Route::List.path()).into_response()
}

// ── POST /saved/:id/delete (form) ────────────────────────────

async fn delete_form<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Some(photo) = state.photos.get_saved_by_id(id) {
        let _ = state.photos.delete(&photo).await;
    }
    Redirect::to(&Route::List.path()).into_response()
}

// ── GET /api/photos ──────────────────────────────────────────

async fn list_photos<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
) -> Response {
    Json(state.photos.available()).into_response()
}

// ── POST /api/photos/reload ──────────────────────────────────

async fn reload_photos<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
) -> Response {
    Json(state.photos.load_available().await).into_response()
}

// ── GET /api/photos/:id ──────────────────────────────────────

async fn get_photo<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.photos.get_by_id(id) {
        Some(photo) => Json(photo).into_response(),
        None => (StatusCode::NOT_FOUND, "Image not found").into_response(),
    }
}

// ── POST /api/photos/:id/view ────────────────────────────────

async fn view_photo<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    // Same lookup as the detail page, so the redirect never lands on a 404.
    match state.photos.get_by_id(id) {
        Some(photo) => {
            let route = state.photos.view_image(&photo);
            Redirect::to(&route.path()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Image not found").into_response(),
    }
}

// ── GET /api/saved ───────────────────────────────────────────

async fn list_saved<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
) -> Response {
    Json(state.photos.saved()).into_response()
}

// ── POST /api/saved ──────────────────────────────────────────

async fn save_photo<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Json(photo): Json<Photo>,
) -> Response {
    match state.photos.save(photo).await {
        Ok(()) => (StatusCode::CREATED, Json(state.photos.saved())).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// ── DELETE /api/saved/:id ────────────────────────────────────

async fn delete_saved<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(photo) = state.photos.get_saved_by_id(id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match state.photos.delete(&photo).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// ── GET /api/albums ──────────────────────────────────────────

async fn list_albums<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
) -> Response {
    match state.photos.fetch_albums().await {
        Ok(albums) => Json(albums).into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

// ── GET /api/sync ────────────────────────────────────────────

async fn sync_status<S: PhotoStore, P: PhotoSource>(
    State(state): State<AppState<S, P>>,
) -> Response {
    let report = state.sync.borrow().clone();
    Json(report).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{SavedPhotoRecord, sample_photo};
    use crate::core::source::fixture::FixtureSource;
    use crate::core::storage::memory::MemoryStore;
    use axum::body::to_bytes;
    use axum::http::header::LOCATION;

    type TestState = AppState<MemoryStore, FixtureSource>;

    /// Catalog 1..=5 with a preview of 3, plus `saved` already in the store.
    async fn loaded_state(saved: &[PhotoId]) -> (TestState, Arc<MemoryStore>) {
        let records = saved.iter().map(|&id| SavedPhotoRecord::from(&sample_photo(id))).collect();
        let store = Arc::new(MemoryStore::with_saved(records));
        let source = Arc::new(FixtureSource::new((1..=5).map(sample_photo).collect()));
        let photos = Arc::new(ImageListState::new(Arc::clone(&store), source, 3));
        photos.initial_load().await;
        let sync = watch::channel(JobReport::Pending).1;
        (TestState { photos, sync }, store)
    }

    fn path(raw: &str) -> Path<String> {
        Path(raw.to_string())
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_detail_page_status_codes() {
        let (state, _) = loaded_state(&[]).await;

        let resp = detail_page(State(state.clone()), path("abc")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(resp).await.contains("Error: Invalid image ID"));

        let resp = detail_page(State(state.clone()), path("2")).await;
        assert_eq!(resp.status(), StatusCode::OK);

        // 4 exists remotely but is outside the preview.
        let resp = detail_page(State(state), path("4")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_text(resp).await.contains("Error: Image not found"));
    }

    #[tokio::test]
    async fn test_view_redirects_only_to_existing_detail_page() {
        let (state, _) = loaded_state(&[5]).await;

        let resp = view_photo(State(state.clone()), path("2")).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/photos/2");

        // Saved but not in the preview: the detail page would 404.
        let resp = view_photo(State(state.clone()), path("5")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let page = detail_page(State(state), path("5")).await;
        assert_eq!(page.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_photo_rejects_negative_id() {
        let (state, _) = loaded_state(&[]).await;

        let resp = get_photo(State(state.clone()), path("-1")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = get_photo(State(state), path("3")).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_save_photo_returns_created() {
        let (state, store) = loaded_state(&[]).await;

        let resp = save_photo(State(state.clone()), Json(sample_photo(9))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(store.saved_ids(), vec![9]);
        assert!(state.photos.get_saved_by_id(9).is_some());
    }

    #[tokio::test]
    async fn test_storage_failure_maps_to_500_and_keeps_memory() {
        let (state, store) = loaded_state(&[]).await;
        store.set_failing(true);

        let resp = save_photo(State(state.clone()), Json(sample_photo(9))).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(resp).await.contains("disk I/O error"));
        assert!(state.photos.get_saved_by_id(9).is_some());
        assert!(store.saved_ids().is_empty());
    }

    #[tokio::test]
    async fn test_delete_saved_no_content_then_not_found() {
        let (state, store) = loaded_state(&[4]).await;

        let resp = delete_saved(State(state.clone()), path("4")).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(store.saved_ids().is_empty());

        let resp = delete_saved(State(state), path("4")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sync_status_reports_job_state() {
        let (state, _) = loaded_state(&[]).await;

        let resp = sync_status(State(state)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains(r#""status":"pending""#));
    }
}
