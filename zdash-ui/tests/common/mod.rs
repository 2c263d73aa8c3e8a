//! Shared test helpers: library fixtures and an in-process mock of the
//! Zotero Web API.

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use zdash_common::{Collection, ZoteroItem};

pub const TEST_LIBRARY_ID: u64 = 12345;
pub const TEST_API_KEY: &str = "test-api-key";
/// Served under `/groups/{id}` only
pub const TEST_GROUP_ID: u64 = 67890;
/// Every request for this library answers 500
pub const FAILING_LIBRARY_ID: u64 = 500;

pub fn item(key: &str, date_added: &str, collection: Option<&str>) -> ZoteroItem {
    let collections: Vec<&str> = collection.into_iter().collect();
    serde_json::from_value(json!({
        "key": key,
        "version": 1,
        "data": {
            "key": key,
            "itemType": "webpage",
            "title": format!("Title {}", key),
            "websiteTitle": "Example Site",
            "url": format!("https://example.org/{}", key),
            "creators": [{"creatorType": "author", "firstName": "Ada", "lastName": "Lovelace"}],
            "dateAdded": date_added,
            "collections": collections,
        }
    }))
    .unwrap()
}

pub fn attachment(key: &str, date_added: &str) -> ZoteroItem {
    serde_json::from_value(json!({
        "key": key,
        "data": {"itemType": "attachment", "dateAdded": date_added, "parentItem": "PARENT01"}
    }))
    .unwrap()
}

pub fn collection(key: &str, name: &str) -> Collection {
    serde_json::from_value(json!({
        "key": key,
        "data": {"key": key, "name": name, "parentCollection": false}
    }))
    .unwrap()
}

/// Small library spanning two years and two collections
pub fn sample_library() -> (Vec<ZoteroItem>, Vec<Collection>) {
    let collections = vec![collection("SYS00001", "Systems"), collection("DB000001", "Databases")];
    let items = vec![
        item("A0000001", "2023-11-20T09:00:00Z", Some("SYS00001")),
        item("A0000002", "2024-03-05T08:00:00Z", Some("SYS00001")),
        item("A0000003", "2024-03-05T17:45:00Z", Some("DB000001")),
        item("A0000004", "2024-03-07T12:00:00Z", Some("SYS00001")),
        item("A0000005", "2024-12-31T12:00:00Z", None),
        attachment("F0000001", "2024-03-05T08:01:00Z"),
    ];
    (items, collections)
}

/// `count` items, one per day from 2024-01-01, all in `collection`
pub fn many_items(count: usize, collection: &str) -> Vec<ZoteroItem> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            let day = start + chrono::Duration::days((i % 366) as i64);
            item(
                &format!("M{:07}", i),
                &format!("{}T10:00:00Z", day.format("%Y-%m-%d")),
                Some(collection),
            )
        })
        .collect()
}

struct MockLibrary {
    items: Vec<Value>,
    collections: Vec<Value>,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    start: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    25
}

/// Start a mock Zotero API on an ephemeral port; returns its base URL
pub async fn spawn_mock_zotero(items: Vec<ZoteroItem>, collections: Vec<Collection>) -> String {
    let library = Arc::new(MockLibrary {
        items: items.iter().map(|i| serde_json::to_value(i).unwrap()).collect(),
        collections: collections
            .iter()
            .map(|c| serde_json::to_value(c).unwrap())
            .collect(),
    });

    let app = Router::new()
        .route("/users/:id/items", get(list_items))
        .route("/users/:id/collections", get(list_collections))
        .route("/users/:id/collections/:key/items", get(list_collection_items))
        .route("/groups/:id/items", get(list_items))
        .route("/groups/:id/collections", get(list_collections))
        .route("/groups/:id/collections/:key/items", get(list_collection_items))
        .with_state(library);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn authorize(uri: &Uri, id: u64, headers: &HeaderMap) -> Result<(), Response> {
    if id == FAILING_LIBRARY_ID {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "An error occurred").into_response());
    }
    let expected = if uri.path().starts_with("/groups/") {
        TEST_GROUP_ID
    } else {
        TEST_LIBRARY_ID
    };
    if id != expected {
        return Err((StatusCode::NOT_FOUND, "Not found").into_response());
    }
    let key = headers.get("Zotero-API-Key").and_then(|v| v.to_str().ok());
    let version = headers.get("Zotero-API-Version").and_then(|v| v.to_str().ok());
    if key != Some(TEST_API_KEY) || version != Some("3") {
        return Err((StatusCode::FORBIDDEN, "Forbidden").into_response());
    }
    Ok(())
}

fn paginate(values: &[Value], page: &Page) -> Response {
    let end = (page.start + page.limit).min(values.len());
    let slice = if page.start < values.len() {
        values[page.start..end].to_vec()
    } else {
        Vec::new()
    };
    (
        [("Total-Results", values.len().to_string())],
        Json(Value::Array(slice)),
    )
        .into_response()
}

async fn list_items(
    State(library): State<Arc<MockLibrary>>,
    Path(id): Path<u64>,
    Query(page): Query<Page>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authorize(&uri, id, &headers) {
        return response;
    }
    paginate(&library.items, &page)
}

async fn list_collections(
    State(library): State<Arc<MockLibrary>>,
    Path(id): Path<u64>,
    Query(page): Query<Page>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authorize(&uri, id, &headers) {
        return response;
    }
    paginate(&library.collections, &page)
}

async fn list_collection_items(
    State(library): State<Arc<MockLibrary>>,
    Path((id, key)): Path<(u64, String)>,
    Query(page): Query<Page>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = authorize(&uri, id, &headers) {
        return response;
    }
    let filtered: Vec<Value> = library
        .items
        .iter()
        .filter(|item| {
            item["data"]["collections"]
                .as_array()
                .map_or(false, |keys| keys.iter().any(|k| k == key.as_str()))
        })
        .cloned()
        .collect();
    paginate(&filtered, &page)
}
