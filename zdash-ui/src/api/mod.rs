//! HTTP API handlers for zdash-ui

pub mod buildinfo;
pub mod collections;
pub mod day;
pub mod health;
pub mod heatmap;
pub mod library;
pub mod timeseries;
pub mod ui;

pub use buildinfo::buildinfo_routes;
pub use collections::collection_routes;
pub use day::day_routes;
pub use health::health_routes;
pub use heatmap::heatmap_routes;
pub use library::library_routes;
pub use timeseries::timeseries_routes;
pub use ui::ui_routes;

use std::sync::Arc;

use crate::session::LibrarySnapshot;
use crate::{ApiError, ApiResult, AppState};

/// Loaded snapshot, or `NoData` when nothing has been fetched yet
pub(crate) async fn require_snapshot(state: &AppState) -> ApiResult<Arc<LibrarySnapshot>> {
    state.session.current().await.ok_or(ApiError::NoData)
}

fn default_true() -> bool {
    true
}
