//! Zotero Web API integration

pub mod client;

pub use client::{find_collection_key, ZoteroClient, ZoteroConfig, ZoteroError};
