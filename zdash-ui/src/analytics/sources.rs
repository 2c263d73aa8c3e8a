//! Source cards: the per-item detail shown when a heatmap day is opened

use chrono::NaiveDate;
use serde::Serialize;
use zdash_common::{Collection, Result, ZoteroItem};

use super::filter::{extract_items_for_date, DateFilter};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthorLine {
    pub creator_type: String,
    pub name: String,
}

/// Display fields of one source
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceCard {
    pub key: String,
    /// `"{website}: {title}"`, or just the title without a website
    pub header: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub website_title: Option<String>,
    pub abstract_note: Option<String>,
    pub authors: Vec<AuthorLine>,
    pub collection_name: Option<String>,
}

pub fn build_source_card(item: &ZoteroItem, collections: &[Collection]) -> SourceCard {
    let data = &item.data;

    let authors = data
        .creators
        .iter()
        .map(|c| AuthorLine {
            creator_type: c.creator_type.clone(),
            name: c.display_name(),
        })
        .collect();

    let collection_name = item.primary_collection().and_then(|key| {
        collections
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.data.name.clone())
    });

    let title = data.title.as_deref().unwrap_or_default();
    let header = match data.website_title.as_deref() {
        Some(website) if !website.is_empty() => format!("{}: {}", website, title),
        _ => title.to_string(),
    };

    SourceCard {
        key: item.key.clone(),
        header,
        title: data.title.clone(),
        url: data.url.clone(),
        website_title: data.website_title.clone(),
        abstract_note: data.abstract_note.clone(),
        authors,
        collection_name,
    }
}

/// Cards for every source added on `day`, in library order
pub fn sources_for_day(
    items: &[ZoteroItem],
    collections: &[Collection],
    day: NaiveDate,
) -> Result<Vec<SourceCard>> {
    Ok(extract_items_for_date(items, DateFilter::On(day))?
        .into_iter()
        .map(|item| build_source_card(item, collections))
        .collect())
}
