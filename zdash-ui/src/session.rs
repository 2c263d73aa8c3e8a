//! In-memory library snapshot
//!
//! Holds the most recently fetched items and collections. Every chart is
//! derived from the snapshot on request; nothing derived is cached.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use zdash_common::{Collection, ZoteroItem};

use crate::zotero::{ZoteroClient, ZoteroError};

/// Items and collections of one library at one point in time
#[derive(Debug, Clone)]
pub struct LibrarySnapshot {
    pub library_id: u64,
    pub items: Vec<ZoteroItem>,
    pub collections: Vec<Collection>,
    pub fetched_at: DateTime<Utc>,
}

impl LibrarySnapshot {
    pub fn new(library_id: u64, items: Vec<ZoteroItem>, collections: Vec<Collection>) -> Self {
        Self {
            library_id,
            items,
            collections,
            fetched_at: zdash_common::time::now(),
        }
    }

    /// Fetch all items and collections through `client`
    pub async fn fetch(client: &ZoteroClient) -> Result<Self, ZoteroError> {
        let items = client.fetch_items().await?;
        let collections = client.fetch_collections().await?;
        Ok(Self::new(client.config().library_id, items, collections))
    }
}

/// Connection status shown next to the credential inputs
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LibraryStatus {
    pub found: bool,
    pub label: String,
    /// Bootstrap colour name for the status badge
    pub color: String,
    pub item_count: usize,
    pub collection_count: usize,
    pub library_id: Option<u64>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl LibraryStatus {
    pub fn from_snapshot(snapshot: Option<&LibrarySnapshot>) -> Self {
        match snapshot {
            Some(s) if !s.items.is_empty() => Self {
                found: true,
                label: "Data Found Successfully".to_string(),
                color: "success".to_string(),
                item_count: s.items.len(),
                collection_count: s.collections.len(),
                library_id: Some(s.library_id),
                fetched_at: Some(s.fetched_at),
            },
            other => Self {
                found: false,
                label: "No Data Found".to_string(),
                color: "danger".to_string(),
                item_count: 0,
                collection_count: other.map_or(0, |s| s.collections.len()),
                library_id: other.map(|s| s.library_id),
                fetched_at: other.map(|s| s.fetched_at),
            },
        }
    }
}

/// Shared holder for the current snapshot
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Arc<LibrarySnapshot>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot, returning the new status
    pub async fn replace(&self, snapshot: LibrarySnapshot) -> LibraryStatus {
        let status = LibraryStatus::from_snapshot(Some(&snapshot));
        *self.inner.write().await = Some(Arc::new(snapshot));
        status
    }

    /// Current snapshot; the lock is released before the caller computes
    pub async fn current(&self) -> Option<Arc<LibrarySnapshot>> {
        self.inner.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }

    pub async fn status(&self) -> LibraryStatus {
        let snapshot = self.current().await;
        LibraryStatus::from_snapshot(snapshot.as_deref())
    }
}
