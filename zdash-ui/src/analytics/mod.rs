//! Aggregations behind the dashboard charts
//!
//! Everything here is a pure function over the fetched items and
//! collections; results are recomputed on every request.

pub mod counts;
pub mod filter;
pub mod heatmap;
pub mod records;
pub mod sources;
pub mod timeseries;

pub use counts::{create_collection_counts, radar_series, CollectionCount, RadarSeries};
pub use filter::{extract_items_for_date, item_day, DateFilter};
pub use heatmap::{
    build_heatmap_from_items, build_multi_year_heatmap, build_source_array, build_year_heatmap,
    YearHeatmap,
};
pub use records::{to_source_records, SourceRecord};
pub use sources::{build_source_card, sources_for_day, SourceCard};
pub use timeseries::{create_collection_timeseries, CollectionTimeseries, Series, TimeseriesRange};
