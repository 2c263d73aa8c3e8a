//! Integration tests for zdash-ui API endpoints
//!
//! Tests cover:
//! - Health and UI routes
//! - Library connect / status / clear (against the mock Zotero API)
//! - Heatmap, day sources, collection counts and timeseries
//! - NO_DATA handling before a library is loaded
//! - Error envelopes for bad input, bad library dates and upstream failures

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method
use zdash_ui::session::LibrarySnapshot;
use zdash_ui::{build_router, AppState};

use common::{
    item, sample_library, spawn_mock_zotero, FAILING_LIBRARY_ID, TEST_API_KEY, TEST_GROUP_ID,
    TEST_LIBRARY_ID,
};

/// Test helper: router with the sample library loaded
async fn loaded_app() -> axum::Router {
    let (items, collections) = sample_library();
    let state = AppState::default()
        .with_snapshot(LibrarySnapshot::new(TEST_LIBRARY_ID, items, collections))
        .await;
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: send one request, return status and JSON body
async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Health / UI
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_router(AppState::default());

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "zdash-ui");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_dashboard_page_served() {
    let app = build_router(AppState::default());

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Zotero Dashboard"));
    assert!(html.contains("/api/library/connect"));
}

#[tokio::test]
async fn test_buildinfo() {
    let app = build_router(AppState::default());

    let (status, body) = send(&app, get("/api/buildinfo")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

// =============================================================================
// No data loaded
// =============================================================================

#[tokio::test]
async fn test_status_without_library() {
    let app = build_router(AppState::default());

    let (status, body) = send(&app, get("/api/library/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);
    assert_eq!(body["label"], "No Data Found");
    assert_eq!(body["color"], "danger");
}

#[tokio::test]
async fn test_charts_without_library_are_conflict() {
    let app = build_router(AppState::default());

    for uri in [
        "/api/heatmap?year=2024",
        "/api/day?date=2024-03-05",
        "/api/collections/counts",
        "/api/collections/timeseries?name=Systems",
        "/api/timeseries/total",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::CONFLICT, "{}", uri);
        assert_eq!(body["error"]["code"], "NO_DATA", "{}", uri);
    }
}

// =============================================================================
// Library connect
// =============================================================================

#[tokio::test]
async fn test_connect_fetches_and_stores_library() {
    let (items, collections) = sample_library();
    let base_url = spawn_mock_zotero(items, collections).await;
    let app = build_router(AppState::new(base_url, 20));

    let (status, body) = send(
        &app,
        post_json(
            "/api/library/connect",
            json!({"library_id": TEST_LIBRARY_ID, "api_key": TEST_API_KEY}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["label"], "Data Found Successfully");
    assert_eq!(body["color"], "success");
    assert_eq!(body["item_count"], 6);
    assert_eq!(body["collection_count"], 2);

    let (_, heatmap) = send(&app, get("/api/heatmap?year=2024")).await;
    assert_eq!(heatmap["heatmap"]["total"], 4);
}

#[tokio::test]
async fn test_connect_requires_credentials() {
    let app = build_router(AppState::default());

    let (status, body) = send(
        &app,
        post_json("/api/library/connect", json!({"library_id": TEST_LIBRARY_ID})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send(
        &app,
        post_json("/api/library/connect", json!({"api_key": TEST_API_KEY})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_connect_with_bad_key_keeps_previous_snapshot() {
    let (items, collections) = sample_library();
    let base_url = spawn_mock_zotero(items.clone(), collections.clone()).await;
    let state = AppState::new(base_url, 20)
        .with_snapshot(LibrarySnapshot::new(TEST_LIBRARY_ID, items, collections))
        .await;
    let app = build_router(state);

    let (status, body) = send(
        &app,
        post_json(
            "/api/library/connect",
            json!({"library_id": TEST_LIBRARY_ID, "api_key": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "ZOTERO_FORBIDDEN");

    let (_, status_body) = send(&app, get("/api/library/status")).await;
    assert_eq!(status_body["found"], true);
}

#[tokio::test]
async fn test_connect_group_library() {
    let (items, collections) = sample_library();
    let base_url = spawn_mock_zotero(items, collections).await;
    let app = build_router(AppState::new(base_url, 20));

    let (status, body) = send(
        &app,
        post_json(
            "/api/library/connect",
            json!({"library_id": TEST_GROUP_ID, "api_key": TEST_API_KEY, "library_type": "group"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], true);
    assert_eq!(body["library_id"], TEST_GROUP_ID);
}

#[tokio::test]
async fn test_connect_upstream_failure_is_bad_gateway() {
    let (items, collections) = sample_library();
    let base_url = spawn_mock_zotero(items, collections).await;
    let app = build_router(AppState::new(base_url, 20));

    let (status, body) = send(
        &app,
        post_json(
            "/api/library/connect",
            json!({"library_id": FAILING_LIBRARY_ID, "api_key": TEST_API_KEY}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");

    let (_, status_body) = send(&app, get("/api/library/status")).await;
    assert_eq!(status_body["found"], false);
}

#[tokio::test]
async fn test_connect_malformed_body_uses_error_envelope() {
    let app = build_router(AppState::default());

    let request = Request::builder()
        .method("POST")
        .uri("/api/library/connect")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_clear_library() {
    let app = loaded_app().await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/library")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], false);

    let (status, _) = send(&app, get("/api/heatmap?year=2024")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Heatmap
// =============================================================================

#[tokio::test]
async fn test_heatmap_for_year() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/heatmap?year=2024")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Sources Read in 2024");
    assert_eq!(body["heatmap"]["year"], 2024);
    assert_eq!(body["heatmap"]["total"], 4);
    assert_eq!(body["heatmap"]["max_count"], 2);

    let cells = body["heatmap"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 366);
    assert_eq!(cells[64]["label"], "05 Mar, 2024");
    assert_eq!(cells[64]["count"], 2);
    // 2024-12-31 sits in ISO week 1 of 2025
    assert_eq!(cells[365]["week"], 53);
    assert_eq!(cells[365]["count"], 1);
}

#[tokio::test]
async fn test_heatmap_for_collection() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/heatmap?year=2024&collection=Systems")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["collection"], "Systems");
    assert_eq!(body["heatmap"]["total"], 2);

    let (status, body) = send(&app, get("/api/heatmap?year=2024&collection=Videos")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_multi_year_heatmap() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/heatmap/years?years=2023,2024")).await;
    assert_eq!(status, StatusCode::OK);
    let heatmaps = body["heatmaps"].as_array().unwrap();
    assert_eq!(heatmaps.len(), 2);
    assert_eq!(heatmaps[0]["total"], 1);
    assert_eq!(heatmaps[0]["cells"].as_array().unwrap().len(), 365);
    assert_eq!(heatmaps[1]["total"], 4);

    let (status, _) = send(&app, get("/api/heatmap/years?years=soon")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_heatmap_bad_year_uses_error_envelope() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/heatmap?year=soon")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, body) = send(&app, get("/api/heatmap/years")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_malformed_date_added_is_unprocessable() {
    let (mut items, collections) = sample_library();
    items.push(item("BAD00001", "05/03/2024", Some("SYS00001")));
    let state = AppState::default()
        .with_snapshot(LibrarySnapshot::new(TEST_LIBRARY_ID, items, collections))
        .await;
    let app = build_router(state);

    for uri in [
        "/api/heatmap?year=2024",
        "/api/heatmap/years?years=2024",
        "/api/day?date=2024-03-05",
        "/api/timeseries/total",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["error"]["code"], "INVALID_DATE", "{}", uri);
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("BAD00001"), "{}: {}", uri, message);
    }
}

// =============================================================================
// Day sources
// =============================================================================

#[tokio::test]
async fn test_day_sources_by_date() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/day?date=2024-03-05")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Sources read on 2024-03-05");

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["key"], "A0000002");
    assert_eq!(sources[0]["header"], "Example Site: Title A0000002");
    assert_eq!(sources[0]["collection_name"], "Systems");
    assert_eq!(sources[0]["authors"][0]["name"], "Ada, Lovelace");
    assert_eq!(sources[1]["collection_name"], "Databases");
}

#[tokio::test]
async fn test_day_sources_by_heatmap_label() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/day?label=05%20Mar%2C%202024")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2024-03-05");
    assert_eq!(body["sources"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_day_sources_bad_input() {
    let app = loaded_app().await;

    let (status, _) = send(&app, get("/api/day")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/day?date=March")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_day_without_sources_is_empty() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/day?date=2024-03-06")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["sources"].as_array().unwrap().is_empty());
}

// =============================================================================
// Collections
// =============================================================================

#[tokio::test]
async fn test_collection_counts_and_cutoff() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/collections/counts?cutoff=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cutoff"], 0);
    assert_eq!(body["radar"]["r"], json!([3, 1]));
    assert_eq!(body["radar"]["theta"], json!(["Systems", "Databases"]));

    let (_, body) = send(&app, get("/api/collections/counts?cutoff=2")).await;
    assert_eq!(body["radar"]["theta"], json!(["Systems"]));

    // Default cutoff (20) hides everything in a small library
    let (_, body) = send(&app, get("/api/collections/counts")).await;
    assert_eq!(body["cutoff"], 20);
    assert!(body["counts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_collection_timeseries() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/collections/timeseries?name=Systems")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Total Sources Read for Systems");
    assert_eq!(body["cumulative"], true);

    let dates = body["timeseries"]["dates"].as_array().unwrap();
    assert_eq!(dates.first().unwrap(), "2023-11-20");
    assert_eq!(dates.last().unwrap(), "2024-12-31");

    let series = body["timeseries"]["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    let values = series[0]["values"].as_array().unwrap();
    assert_eq!(values.len(), dates.len());
    assert_eq!(values.last().unwrap(), 3);

    let (status, _) = send(&app, get("/api/collections/timeseries?name=Videos")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_total_timeseries() {
    let app = loaded_app().await;

    let (status, body) = send(&app, get("/api/timeseries/total")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeseries"]["series"].as_array().unwrap().len(), 2);
    // The unfiled item is not part of any collection series
    assert_eq!(body["total"]["values"].as_array().unwrap().last().unwrap(), 4);

    let (_, daily) = send(&app, get("/api/timeseries/total?cumulative=false")).await;
    let sum: u64 = daily["total"]["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .sum();
    assert_eq!(sum, 4);
}
