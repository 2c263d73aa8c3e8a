//! Zotero Web API client
//!
//! Read-only access to a user or group library through the v3 API:
//! all items, all collections, and the items of one named collection.
//! List endpoints are paginated with `start`/`limit` and report the full
//! size in the `Total-Results` header; every page is fetched in sequence.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use zdash_common::config::DEFAULT_ZOTERO_BASE_URL;
use zdash_common::{Collection, LibraryType, ZoteroItem};

const USER_AGENT: &str = concat!("zdash/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "3";
/// Largest page size the Zotero API accepts
pub const PAGE_SIZE: usize = 100;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Zotero client errors
#[derive(Debug, Error)]
pub enum ZoteroError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Access denied (check library ID and API key)")]
    Forbidden,

    #[error("Library not found: {0}")]
    LibraryNotFound(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Connection settings for one Zotero library
#[derive(Clone)]
pub struct ZoteroConfig {
    pub base_url: String,
    pub library_id: u64,
    pub library_type: LibraryType,
    pub api_key: String,
}

impl ZoteroConfig {
    pub fn new(library_id: u64, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_ZOTERO_BASE_URL.to_string(),
            library_id,
            library_type: LibraryType::User,
            api_key: api_key.into(),
        }
    }

    pub fn with_library_type(mut self, library_type: LibraryType) -> Self {
        self.library_type = library_type;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `https://api.zotero.org/users/12345`
    pub fn library_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.library_type.path_segment(),
            self.library_id
        )
    }
}

impl std::fmt::Debug for ZoteroConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroConfig")
            .field("base_url", &self.base_url)
            .field("library_id", &self.library_id)
            .field("library_type", &self.library_type)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Zotero Web API client
pub struct ZoteroClient {
    http_client: reqwest::Client,
    config: ZoteroConfig,
}

impl ZoteroClient {
    pub fn new(config: ZoteroConfig) -> Result<Self, ZoteroError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ZoteroError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ZoteroConfig {
        &self.config
    }

    /// Every item in the library, attachments and notes included
    pub async fn fetch_items(&self) -> Result<Vec<ZoteroItem>, ZoteroError> {
        let items: Vec<ZoteroItem> = self.fetch_all("items").await?;
        tracing::info!(
            library_id = self.config.library_id,
            count = items.len(),
            "Retrieved items from Zotero"
        );
        Ok(items)
    }

    /// Every collection in the library
    pub async fn fetch_collections(&self) -> Result<Vec<Collection>, ZoteroError> {
        let collections: Vec<Collection> = self.fetch_all("collections").await?;
        tracing::info!(
            library_id = self.config.library_id,
            count = collections.len(),
            "Retrieved collections from Zotero"
        );
        Ok(collections)
    }

    /// Items of the collection called `name`
    ///
    /// Returns `Ok(None)` when no collection has that name. If several
    /// collections share the name, the last one listed wins.
    pub async fn fetch_collection_items(
        &self,
        name: &str,
    ) -> Result<Option<Vec<ZoteroItem>>, ZoteroError> {
        let collections = self.fetch_collections().await?;
        let Some(key) = find_collection_key(&collections, name) else {
            tracing::warn!(collection = %name, "No Zotero collection with this name");
            return Ok(None);
        };

        let items: Vec<ZoteroItem> = self
            .fetch_all(&format!("collections/{}/items", key))
            .await?;
        tracing::info!(
            collection = %name,
            count = items.len(),
            "Retrieved collection items from Zotero"
        );
        Ok(Some(items))
    }

    async fn fetch_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ZoteroError> {
        let url = format!("{}/{}", self.config.library_url(), path);
        let mut results = Vec::new();
        let mut start = 0usize;

        loop {
            tracing::debug!(url = %url, start, "Querying Zotero API");

            let response = self
                .http_client
                .get(&url)
                .header("Zotero-API-Key", &self.config.api_key)
                .header("Zotero-API-Version", API_VERSION)
                .query(&[("start", start), ("limit", PAGE_SIZE)])
                .send()
                .await
                .map_err(|e| ZoteroError::Network(e.to_string()))?;

            let status = response.status();

            if status == 403 {
                return Err(ZoteroError::Forbidden);
            }

            if status == 404 {
                return Err(ZoteroError::LibraryNotFound(self.config.library_url()));
            }

            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                return Err(ZoteroError::Api(status.as_u16(), error_text));
            }

            let total = total_results(response.headers());

            let page: Vec<T> = response
                .json()
                .await
                .map_err(|e| ZoteroError::Parse(e.to_string()))?;

            let fetched = page.len();
            results.extend(page);
            start += fetched;

            if is_last_page(fetched, start, total) {
                break;
            }
        }

        Ok(results)
    }
}

/// Key of the last collection named `name`
pub fn find_collection_key<'a>(collections: &'a [Collection], name: &str) -> Option<&'a str> {
    collections
        .iter()
        .rev()
        .find(|c| c.data.name == name)
        .map(|c| c.key.as_str())
}

fn total_results(headers: &reqwest::header::HeaderMap) -> Option<usize> {
    headers
        .get("Total-Results")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn is_last_page(fetched: usize, seen: usize, total: Option<usize>) -> bool {
    match total {
        _ if fetched == 0 => true,
        Some(total) => seen >= total,
        None => fetched < PAGE_SIZE,
    }
}
