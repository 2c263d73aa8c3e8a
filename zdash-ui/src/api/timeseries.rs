//! Total sources read over time

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{default_true, require_snapshot};
use crate::analytics::{create_collection_timeseries, CollectionTimeseries, Series, TimeseriesRange};
use crate::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TotalQuery {
    #[serde(default = "default_true")]
    pub cumulative: bool,
    /// Extend the axis to 31 December of the latest year
    #[serde(default)]
    pub to_year_end: bool,
}

#[derive(Debug, Serialize)]
pub struct TotalTimeseriesResponse {
    pub cumulative: bool,
    /// One series per collection ("Categories" legend)
    pub timeseries: CollectionTimeseries,
    /// All collections combined
    pub total: Series,
}

/// GET /api/timeseries/total?cumulative=true
pub async fn get_total_timeseries(
    State(state): State<AppState>,
    query: Result<Query<TotalQuery>, QueryRejection>,
) -> ApiResult<Json<TotalTimeseriesResponse>> {
    let Query(query) = query?;
    let snapshot = require_snapshot(&state).await?;

    let range = if query.to_year_end {
        TimeseriesRange::ToYearEnd
    } else {
        TimeseriesRange::ItemSpan
    };
    let daily = create_collection_timeseries(&snapshot.items, &snapshot.collections, range)?;
    let timeseries = if query.cumulative {
        daily.cumulative()
    } else {
        daily
    };
    let total = timeseries.total();

    Ok(Json(TotalTimeseriesResponse {
        cumulative: query.cumulative,
        timeseries,
        total,
    }))
}

pub fn timeseries_routes() -> Router<AppState> {
    Router::new().route("/api/timeseries/total", get(get_total_timeseries))
}
