//! Calendar heatmap endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use zdash_common::ZoteroItem;

use super::require_snapshot;
use crate::analytics::{build_heatmap_from_items, build_multi_year_heatmap, to_source_records, YearHeatmap};
use crate::session::LibrarySnapshot;
use crate::zotero::find_collection_key;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// Restrict to the sources of one named collection
    pub collection: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearsQuery {
    /// Comma separated, e.g. `2023,2024`
    pub years: String,
}

#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub title: String,
    pub collection: Option<String>,
    pub heatmap: YearHeatmap,
}

#[derive(Debug, Serialize)]
pub struct MultiYearResponse {
    pub heatmaps: Vec<YearHeatmap>,
}

/// GET /api/heatmap?year=2024&collection=Systems
pub async fn get_heatmap(
    State(state): State<AppState>,
    query: Result<Query<HeatmapQuery>, QueryRejection>,
) -> ApiResult<Json<HeatmapResponse>> {
    let Query(query) = query?;
    let snapshot = require_snapshot(&state).await?;
    let year = query.year.unwrap_or_else(zdash_common::time::current_year);

    let heatmap = match query.collection.as_deref() {
        Some(name) => build_heatmap_from_items(&collection_items(&snapshot, name)?, year)?,
        None => build_heatmap_from_items(&snapshot.items, year)?,
    };

    Ok(Json(HeatmapResponse {
        title: format!("Sources Read in {}", year),
        collection: query.collection,
        heatmap,
    }))
}

/// GET /api/heatmap/years?years=2023,2024
pub async fn get_multi_year_heatmap(
    State(state): State<AppState>,
    query: Result<Query<YearsQuery>, QueryRejection>,
) -> ApiResult<Json<MultiYearResponse>> {
    let Query(query) = query?;
    let years = parse_years(&query.years)?;
    let snapshot = require_snapshot(&state).await?;

    let records = to_source_records(&snapshot.items)?;
    let heatmaps = build_multi_year_heatmap(&records, &years)?;
    Ok(Json(MultiYearResponse { heatmaps }))
}

fn collection_items(snapshot: &LibrarySnapshot, name: &str) -> ApiResult<Vec<ZoteroItem>> {
    let key = find_collection_key(&snapshot.collections, name)
        .ok_or_else(|| ApiError::NotFound(format!("collection '{}'", name)))?;

    Ok(snapshot
        .items
        .iter()
        .filter(|item| item.primary_collection() == Some(key))
        .cloned()
        .collect())
}

fn parse_years(value: &str) -> ApiResult<Vec<i32>> {
    let years = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| ApiError::BadRequest(format!("invalid year '{}'", s)))
        })
        .collect::<ApiResult<Vec<_>>>()?;

    if years.is_empty() {
        return Err(ApiError::BadRequest("at least one year is required".to_string()));
    }
    Ok(years)
}

pub fn heatmap_routes() -> Router<AppState> {
    Router::new()
        .route("/api/heatmap", get(get_heatmap))
        .route("/api/heatmap/years", get(get_multi_year_heatmap))
}
