//! zdash-report - one-shot library summary
//!
//! Fetches a Zotero library (or one collection of it) and prints the
//! dashboard aggregates as JSON on stdout: collection counts, the calendar
//! heatmap for each requested year, and the cumulative total timeseries.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zdash_common::config::resolve_config;
use zdash_common::LibraryType;
use zdash_ui::analytics::{
    build_multi_year_heatmap, create_collection_counts, create_collection_timeseries,
    to_source_records, CollectionCount, Series, TimeseriesRange, YearHeatmap,
};
use zdash_ui::zotero::{ZoteroClient, ZoteroConfig};

#[derive(Parser, Debug)]
#[command(name = "zdash-report")]
#[command(about = "Print Zotero reading-activity aggregates as JSON")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, env = "ZDASH_LIBRARY_ID")]
    library_id: Option<u64>,

    #[arg(long, env = "ZDASH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "ZDASH_LIBRARY_TYPE")]
    library_type: Option<LibraryType>,

    /// Only report on the collection with this name
    #[arg(long)]
    collection: Option<String>,

    /// Heatmap years, comma separated (default: current year)
    #[arg(long, value_delimiter = ',')]
    years: Vec<i32>,

    /// Minimum source count per collection (default from config)
    #[arg(long)]
    cutoff: Option<u32>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report {
    library_id: u64,
    collection: Option<String>,
    item_count: usize,
    source_count: usize,
    collection_counts: Vec<CollectionCount>,
    heatmaps: Vec<YearHeatmap>,
    cumulative_total: Series,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON; RUST_LOG wins over the default
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(args.config.as_deref()).context("Failed to load configuration")?;

    let Some(library_id) = args.library_id.or(config.library_id) else {
        bail!("A library ID is required (--library-id, ZDASH_LIBRARY_ID or config file)");
    };
    let Some(api_key) = args.api_key.clone().or(config.api_key.clone()) else {
        bail!("An API key is required (--api-key, ZDASH_API_KEY or config file)");
    };

    let zotero = ZoteroConfig::new(library_id, api_key)
        .with_library_type(args.library_type.unwrap_or(config.library_type))
        .with_base_url(config.zotero_base_url.as_str());
    let client = ZoteroClient::new(zotero)?;

    let items = match args.collection.as_deref() {
        Some(name) => client
            .fetch_collection_items(name)
            .await?
            .with_context(|| format!("No collection named '{}'", name))?,
        None => client.fetch_items().await?,
    };
    let collections = client.fetch_collections().await?;
    info!("Fetched {} items, {} collections", items.len(), collections.len());

    let years = if args.years.is_empty() {
        vec![zdash_common::time::current_year()]
    } else {
        args.years.clone()
    };
    let cutoff = args.cutoff.unwrap_or(config.radar_cutoff);

    let records = to_source_records(&items)?;
    let timeseries =
        create_collection_timeseries(&items, &collections, TimeseriesRange::ItemSpan)?.cumulative();

    let report = Report {
        library_id,
        collection: args.collection.clone(),
        item_count: items.len(),
        source_count: records.len(),
        collection_counts: create_collection_counts(&items, &collections, Some(cutoff)),
        heatmaps: build_multi_year_heatmap(&records, &years)?,
        cumulative_total: timeseries.total(),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    Ok(())
}

/// `RUST_LOG` as given (bare levels included), else warnings only
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
