//! # zdash Common Library
//!
//! Shared code for the zdash dashboard crates:
//! - Zotero data model (items, creators, collections)
//! - Calendar and timestamp helpers
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use error::{Error, Result};
pub use models::{Collection, CollectionData, Creator, ItemData, LibraryType, ZoteroItem};
