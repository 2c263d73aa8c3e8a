//! Per-collection source counts

use serde::Serialize;
use zdash_common::{Collection, ZoteroItem};

/// Number of sources filed under one collection
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CollectionCount {
    pub key: String,
    pub name: String,
    pub count: u32,
}

/// Radial chart input: `r[i]` sources in collection `theta[i]`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RadarSeries {
    pub r: Vec<u32>,
    pub theta: Vec<String>,
}

/// Count sources per collection, in collection order
///
/// An item counts toward the collection matching its first collection key.
/// Attachments are never counted. With a `cutoff`, collections holding fewer
/// than `cutoff` sources are dropped.
///
/// Items × collections comparisons; fine for a personal library.
pub fn create_collection_counts(
    items: &[ZoteroItem],
    collections: &[Collection],
    cutoff: Option<u32>,
) -> Vec<CollectionCount> {
    let mut counts = Vec::with_capacity(collections.len());

    for collection in collections {
        let mut count = 0u32;
        for item in items {
            if !item.is_attachment() && item.primary_collection() == Some(collection.key.as_str()) {
                count += 1;
            }
        }

        if cutoff.map_or(true, |min| count >= min) {
            counts.push(CollectionCount {
                key: collection.key.clone(),
                name: collection.data.name.clone(),
                count,
            });
        }
    }

    counts
}

/// Split counts into the radial chart's parallel arrays
pub fn radar_series(counts: &[CollectionCount]) -> RadarSeries {
    RadarSeries {
        r: counts.iter().map(|c| c.count).collect(),
        theta: counts.iter().map(|c| c.name.clone()).collect(),
    }
}
