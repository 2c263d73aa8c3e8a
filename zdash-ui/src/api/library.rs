//! Library connection endpoints
//!
//! The dashboard's two credential inputs post here; a successful fetch
//! replaces the snapshot every chart reads from.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};
use zdash_common::LibraryType;

use crate::session::{LibrarySnapshot, LibraryStatus};
use crate::zotero::{ZoteroClient, ZoteroConfig};
use crate::{ApiError, ApiResult, AppState};

/// Credentials posted by the dashboard
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub library_id: Option<u64>,
    pub api_key: Option<String>,
    #[serde(default)]
    pub library_type: LibraryType,
}

/// POST /api/library/connect
///
/// Fetches all items and collections and stores them as the current
/// snapshot. The previous snapshot is kept if the fetch fails.
pub async fn connect_library(
    State(state): State<AppState>,
    request: Result<Json<ConnectRequest>, JsonRejection>,
) -> ApiResult<Json<LibraryStatus>> {
    let Json(request) = request?;
    let library_id = request
        .library_id
        .ok_or_else(|| ApiError::BadRequest("library_id is required".to_string()))?;
    let api_key = request
        .api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("api_key is required".to_string()))?;

    let config = ZoteroConfig::new(library_id, api_key.trim())
        .with_library_type(request.library_type)
        .with_base_url(state.zotero_base_url.as_ref());
    let client = ZoteroClient::new(config)?;

    info!(library_id, library_type = %request.library_type, "Fetching Zotero library");
    let snapshot = LibrarySnapshot::fetch(&client).await.map_err(|e| {
        warn!(library_id, error = %e, "Zotero fetch failed");
        ApiError::from(e)
    })?;

    let status = state.session.replace(snapshot).await;
    info!(
        library_id,
        items = status.item_count,
        collections = status.collection_count,
        "Library snapshot updated"
    );
    Ok(Json(status))
}

/// GET /api/library/status
pub async fn library_status(State(state): State<AppState>) -> Json<LibraryStatus> {
    Json(state.session.status().await)
}

/// DELETE /api/library
pub async fn clear_library(State(state): State<AppState>) -> Json<LibraryStatus> {
    state.session.clear().await;
    info!("Library snapshot cleared");
    Json(state.session.status().await)
}

pub fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/api/library/connect", post(connect_library))
        .route("/api/library/status", get(library_status))
        .route("/api/library", delete(clear_library))
}
