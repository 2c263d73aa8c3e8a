//! Collection breakdown endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{default_true, require_snapshot};
use crate::analytics::{
    create_collection_counts, create_collection_timeseries, radar_series, CollectionCount,
    CollectionTimeseries, RadarSeries, TimeseriesRange,
};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CountsQuery {
    /// Overrides the configured cutoff; `0` keeps every collection
    pub cutoff: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CountsResponse {
    pub cutoff: u32,
    pub counts: Vec<CollectionCount>,
    pub radar: RadarSeries,
}

#[derive(Debug, Deserialize)]
pub struct CollectionTimeseriesQuery {
    pub name: String,
    #[serde(default = "default_true")]
    pub cumulative: bool,
}

#[derive(Debug, Serialize)]
pub struct TimeseriesResponse {
    pub title: String,
    pub cumulative: bool,
    pub timeseries: CollectionTimeseries,
}

/// GET /api/collections/counts?cutoff=20
pub async fn get_collection_counts(
    State(state): State<AppState>,
    query: Result<Query<CountsQuery>, QueryRejection>,
) -> ApiResult<Json<CountsResponse>> {
    let Query(query) = query?;
    let snapshot = require_snapshot(&state).await?;
    let cutoff = query.cutoff.unwrap_or(state.radar_cutoff);

    let counts = create_collection_counts(&snapshot.items, &snapshot.collections, Some(cutoff));
    let radar = radar_series(&counts);

    Ok(Json(CountsResponse {
        cutoff,
        counts,
        radar,
    }))
}

/// GET /api/collections/timeseries?name=Systems&cumulative=true
///
/// Per-day sources of one collection; `name` is the label clicked on the
/// radar chart.
pub async fn get_collection_timeseries(
    State(state): State<AppState>,
    query: Result<Query<CollectionTimeseriesQuery>, QueryRejection>,
) -> ApiResult<Json<TimeseriesResponse>> {
    let Query(query) = query?;
    let snapshot = require_snapshot(&state).await?;

    let selected: Vec<_> = snapshot
        .collections
        .iter()
        .filter(|c| c.data.name == query.name)
        .cloned()
        .collect();
    if selected.is_empty() {
        return Err(ApiError::NotFound(format!("collection '{}'", query.name)));
    }

    let daily = create_collection_timeseries(&snapshot.items, &selected, TimeseriesRange::ItemSpan)?;
    let timeseries = if query.cumulative {
        daily.cumulative()
    } else {
        daily
    };

    Ok(Json(TimeseriesResponse {
        title: format!("Total Sources Read for {}", query.name),
        cumulative: query.cumulative,
        timeseries,
    }))
}

pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/api/collections/counts", get(get_collection_counts))
        .route("/api/collections/timeseries", get(get_collection_timeseries))
}
