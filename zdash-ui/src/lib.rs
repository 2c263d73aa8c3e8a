//! zdash-ui library - Zotero reading-activity dashboard
//!
//! Exposes the router, analytics and Zotero client for the binaries and for
//! integration testing.

pub mod analytics;
pub mod api;
pub mod error;
pub mod session;
pub mod zotero;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use zdash_common::config::{TomlConfig, DEFAULT_RADAR_CUTOFF, DEFAULT_ZOTERO_BASE_URL};

use crate::session::{LibrarySnapshot, SessionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Last fetched library
    pub session: SessionStore,
    /// Zotero Web API base URL used for connect requests
    pub zotero_base_url: Arc<str>,
    /// Default cutoff for the collection breakdown
    pub radar_cutoff: u32,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(zotero_base_url: impl Into<Arc<str>>, radar_cutoff: u32) -> Self {
        Self {
            session: SessionStore::new(),
            zotero_base_url: zotero_base_url.into(),
            radar_cutoff,
            startup_time: Utc::now(),
        }
    }

    pub fn from_config(config: &TomlConfig) -> Self {
        Self::new(config.zotero_base_url.as_str(), config.radar_cutoff)
    }

    /// State with a library already loaded
    pub async fn with_snapshot(self, snapshot: LibrarySnapshot) -> Self {
        self.session.replace(snapshot).await;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_ZOTERO_BASE_URL, DEFAULT_RADAR_CUTOFF)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML page)
        .merge(api::ui_routes())
        // API routes
        .merge(api::library_routes())
        .merge(api::heatmap_routes())
        .merge(api::day_routes())
        .merge(api::collection_routes())
        .merge(api::timeseries_routes())
        .merge(api::buildinfo_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
