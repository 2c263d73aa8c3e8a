//! Daily per-collection timeseries
//!
//! Builds a dense day-by-day table (zero-filled) with one series per
//! collection. Each day's counts come from re-filtering the items for that
//! day, so cost grows with days × items × collections; it is meant for a
//! personal library, not a shared one.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use zdash_common::time::{date_range, year_end};
use zdash_common::{Collection, Result, ZoteroItem};

use super::filter::item_day;

/// Where the date axis ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeseriesRange {
    /// First item day to last item day
    #[default]
    ItemSpan,
    /// First item day to 31 December of the last item's year
    ToYearEnd,
}

/// One collection's values, aligned with [`CollectionTimeseries::dates`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Series {
    pub key: String,
    pub name: String,
    pub values: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct CollectionTimeseries {
    pub dates: Vec<NaiveDate>,
    pub series: Vec<Series>,
}

impl CollectionTimeseries {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Running totals of every series
    pub fn cumulative(&self) -> Self {
        let series = self
            .series
            .iter()
            .map(|s| Series {
                key: s.key.clone(),
                name: s.name.clone(),
                values: s
                    .values
                    .iter()
                    .scan(0u32, |acc, v| {
                        *acc += v;
                        Some(*acc)
                    })
                    .collect(),
            })
            .collect();

        Self {
            dates: self.dates.clone(),
            series,
        }
    }

    /// All series summed into one
    pub fn total(&self) -> Series {
        let mut values = vec![0u32; self.dates.len()];
        for s in &self.series {
            for (slot, v) in values.iter_mut().zip(&s.values) {
                *slot += v;
            }
        }
        Series {
            key: "total".to_string(),
            name: "Total".to_string(),
            values,
        }
    }
}

/// Build the per-day, per-collection source counts
///
/// The date axis spans every non-attachment item in `items`; one series is
/// produced per entry of `collections`, in order. An item counts toward the
/// collection matching its first collection key.
pub fn create_collection_timeseries(
    items: &[ZoteroItem],
    collections: &[Collection],
    range: TimeseriesRange,
) -> Result<CollectionTimeseries> {
    // Parse each date once; the per-day pass below filters this list
    let mut dated: Vec<(NaiveDate, Option<&str>)> = Vec::new();
    for item in items.iter().filter(|i| !i.is_attachment()) {
        dated.push((item_day(item)?, item.primary_collection()));
    }

    let (Some(first), Some(last)) = (
        dated.iter().map(|(d, _)| *d).min(),
        dated.iter().map(|(d, _)| *d).max(),
    ) else {
        return Ok(CollectionTimeseries::default());
    };

    let end = match range {
        TimeseriesRange::ItemSpan => last,
        TimeseriesRange::ToYearEnd => year_end(last.year())?,
    };
    let dates = date_range(first, end);

    let mut series: Vec<Series> = collections
        .iter()
        .map(|c| Series {
            key: c.key.clone(),
            name: c.data.name.clone(),
            values: Vec::with_capacity(dates.len()),
        })
        .collect();

    for day in &dates {
        let on_day: Vec<Option<&str>> = dated
            .iter()
            .filter(|(d, _)| d == day)
            .map(|(_, key)| *key)
            .collect();

        for s in series.iter_mut() {
            let count = on_day.iter().filter(|k| **k == Some(s.key.as_str())).count();
            s.values.push(count as u32);
        }
    }

    Ok(CollectionTimeseries { dates, series })
}
