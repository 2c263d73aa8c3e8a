//! Zotero data model
//!
//! Mirrors the JSON returned by the Zotero Web API (v3). Only the fields the
//! dashboard reads are typed; everything else in an item's `data` object is
//! kept in [`ItemData::extra`] so a snapshot can be re-serialized unchanged.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::time::parse_timestamp;
use crate::Result;

/// Item type used by Zotero for file attachments. Attachments are never
/// counted as sources.
pub const ATTACHMENT_ITEM_TYPE: &str = "attachment";

/// Zotero library kind, selects the `/users/{id}` or `/groups/{id}` prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    #[default]
    User,
    Group,
}

impl LibraryType {
    /// Path segment used by the Zotero API for this library kind
    pub fn path_segment(&self) -> &'static str {
        match self {
            LibraryType::User => "users",
            LibraryType::Group => "groups",
        }
    }
}

impl std::str::FromStr for LibraryType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(LibraryType::User),
            "group" => Ok(LibraryType::Group),
            other => Err(crate::Error::InvalidInput(format!(
                "library type must be 'user' or 'group', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for LibraryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryType::User => write!(f, "user"),
            LibraryType::Group => write!(f, "group"),
        }
    }
}

/// A single Zotero item as returned by `GET /items`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoteroItem {
    /// Item key (8 character Zotero identifier)
    pub key: String,
    /// Library version the item was last modified at
    #[serde(default)]
    pub version: u64,
    /// Item fields
    pub data: ItemData,
}

/// The `data` object of a Zotero item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub creators: Vec<Creator>,
    /// ISO-8601 timestamp with offset, e.g. `2024-03-05T14:02:11Z`
    pub date_added: String,
    /// Collection keys. At most one in practice; only the first is used.
    #[serde(default)]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_note: Option<String>,
    /// Remaining type-specific fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Item creator (author, editor, ...)
///
/// Zotero stores either a single-field `name` or a two-field
/// `firstName`/`lastName` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub creator_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl Creator {
    /// Display form: `name`, or `first, last` for two-field creators
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}, {}",
                self.first_name.as_deref().unwrap_or_default(),
                self.last_name.as_deref().unwrap_or_default()
            ),
        }
    }
}

impl ZoteroItem {
    pub fn is_attachment(&self) -> bool {
        self.data.item_type == ATTACHMENT_ITEM_TYPE
    }

    /// First (and in practice only) collection key
    pub fn primary_collection(&self) -> Option<&str> {
        self.data.collections.first().map(String::as_str)
    }

    /// Parsed `dateAdded`, keeping the original offset
    pub fn date_added(&self) -> Result<DateTime<FixedOffset>> {
        parse_timestamp(&self.data.date_added).map_err(|e| match e {
            crate::Error::InvalidDate { value, reason } => crate::Error::InvalidDate {
                value,
                reason: format!("item {}: {}", self.key, reason),
            },
            other => other,
        })
    }
}

/// A Zotero collection as returned by `GET /collections`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    pub key: String,
    #[serde(default)]
    pub version: u64,
    pub data: CollectionData,
}

/// The `data` object of a Zotero collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionData {
    pub key: String,
    pub name: String,
    /// Parent collection key; the API sends `false` for top-level collections
    #[serde(default, deserialize_with = "parent_collection_key")]
    pub parent_collection: Option<String>,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.data.name
    }
}

fn parent_collection_key<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}
