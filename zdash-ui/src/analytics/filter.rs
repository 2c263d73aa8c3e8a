//! Date filtering of Zotero items

use chrono::NaiveDate;
use zdash_common::time::parse_day;
use zdash_common::{Result, ZoteroItem};

/// Which items a date filter keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// No date restriction; the input is returned untouched
    All,
    /// Items added on exactly this calendar day
    On(NaiveDate),
    /// Items added on or after this calendar day
    Since(NaiveDate),
}

impl DateFilter {
    /// Build a filter from optional `YYYY-MM-DD` strings. A specific `date`
    /// takes precedence over `start_date`.
    pub fn from_params(date: Option<&str>, start_date: Option<&str>) -> Result<Self> {
        match (date, start_date) {
            (Some(date), _) => Ok(DateFilter::On(parse_day(date)?)),
            (None, Some(start)) => Ok(DateFilter::Since(parse_day(start)?)),
            (None, None) => Ok(DateFilter::All),
        }
    }

    fn matches(&self, day: NaiveDate) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::On(target) => day == *target,
            DateFilter::Since(start) => day >= *start,
        }
    }
}

/// Calendar day an item was added, in the offset it was recorded with
pub fn item_day(item: &ZoteroItem) -> Result<NaiveDate> {
    Ok(item.date_added()?.date_naive())
}

/// Items whose `dateAdded` falls on (or after) the filter's day
///
/// Attachments are dropped whenever a date is given. Input order is kept.
/// Fails on the first item whose `dateAdded` does not parse.
pub fn extract_items_for_date(items: &[ZoteroItem], filter: DateFilter) -> Result<Vec<&ZoteroItem>> {
    if filter == DateFilter::All {
        return Ok(items.iter().collect());
    }

    let mut selected = Vec::new();
    for item in items {
        if item.is_attachment() {
            continue;
        }
        if filter.matches(item_day(item)?) {
            selected.push(item);
        }
    }
    Ok(selected)
}
