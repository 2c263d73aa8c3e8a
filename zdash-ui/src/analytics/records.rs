//! Flat source records projected from Zotero items

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use zdash_common::{Creator, Result, ZoteroItem};

/// A non-attachment item reduced to the fields the charts use
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceRecord {
    pub key: String,
    pub date_added: DateTime<FixedOffset>,
    pub title: Option<String>,
    pub creators: Vec<Creator>,
    pub item_type: String,
}

impl SourceRecord {
    /// Calendar day the source was added
    pub fn day(&self) -> NaiveDate {
        self.date_added.date_naive()
    }
}

/// Project items to source records, dropping attachments, oldest first
pub fn to_source_records<'a, I>(items: I) -> Result<Vec<SourceRecord>>
where
    I: IntoIterator<Item = &'a ZoteroItem>,
{
    let mut records = items
        .into_iter()
        .filter(|item| !item.is_attachment())
        .map(|item| {
            Ok(SourceRecord {
                key: item.key.clone(),
                date_added: item.date_added()?,
                title: item.data.title.clone(),
                creators: item.data.creators.clone(),
                item_type: item.data.item_type.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    records.sort_by_key(|r| r.date_added);
    Ok(records)
}
