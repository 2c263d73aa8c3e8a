//! Sources read on a single day (heatmap click-through)

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zdash_common::time::{parse_day, parse_label, DAY_FORMAT};

use super::require_snapshot;
use crate::analytics::{sources_for_day, SourceCard};
use crate::{ApiError, ApiResult, AppState};

/// Either a `YYYY-MM-DD` date or a heatmap cell label (`05 Mar, 2024`)
#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub title: String,
    pub date: NaiveDate,
    pub sources: Vec<SourceCard>,
}

/// GET /api/day?date=2024-03-05
pub async fn get_day_sources(
    State(state): State<AppState>,
    query: Result<Query<DayQuery>, QueryRejection>,
) -> ApiResult<Json<DayResponse>> {
    let Query(query) = query?;
    let day = resolve_day(&query)?;
    let snapshot = require_snapshot(&state).await?;

    let sources = sources_for_day(&snapshot.items, &snapshot.collections, day)?;
    let date_value = day.format(DAY_FORMAT).to_string();

    Ok(Json(DayResponse {
        title: format!("Sources read on {}", date_value),
        date: day,
        sources,
    }))
}

fn resolve_day(query: &DayQuery) -> ApiResult<NaiveDate> {
    let parsed = match (query.date.as_deref(), query.label.as_deref()) {
        (Some(date), _) => parse_day(date),
        (None, Some(label)) => parse_label(label),
        (None, None) => {
            return Err(ApiError::BadRequest(
                "either 'date' or 'label' is required".to_string(),
            ))
        }
    };
    parsed.map_err(|e| ApiError::BadRequest(e.to_string()))
}

pub fn day_routes() -> Router<AppState> {
    Router::new().route("/api/day", get(get_day_sources))
}
