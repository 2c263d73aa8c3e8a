//! Calendar heatmap of sources read per day
//!
//! A year of daily counts is laid out on a week × weekday grid: the x axis is
//! the ISO week number, the y axis the weekday (0 = Monday). Two year-boundary
//! cases need care:
//! - late-December days that ISO assigns to week 1 of the next year are drawn
//!   in column 53
//! - early-January days that ISO assigns to week 52/53 of the previous year
//!   are drawn in column 0

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use zdash_common::time::{date_range, days_in_year, format_label, month_lengths, year_end, year_start};
use zdash_common::{Result, ZoteroItem};

use super::filter::{extract_items_for_date, DateFilter};
use super::records::{to_source_records, SourceRecord};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One day on the grid
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub week: u32,
    pub weekday: u32,
    pub count: u32,
    /// `05 Mar, 2024`; also the key the day view accepts back
    pub label: String,
    pub hover: String,
}

/// A straight gridline segment from `(x[0], y[0])` to `(x[1], y[1])`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Segment {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthTick {
    pub label: &'static str,
    pub position: f64,
}

/// Everything needed to draw one year's calendar heatmap
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearHeatmap {
    pub year: i32,
    pub cells: Vec<HeatmapCell>,
    pub month_lines: Vec<Segment>,
    pub month_ticks: Vec<MonthTick>,
    pub weekday_labels: [&'static str; 7],
    pub total: u32,
    pub max_count: u32,
}

/// Grid column for a day
pub fn week_column(date: NaiveDate) -> u32 {
    let week = date.iso_week().week();
    match date.month() {
        12 if week == 1 => 53,
        1 if week >= 52 => 0,
        _ => week,
    }
}

/// Per-day source counts for `year`, one slot per day (365 or 366)
///
/// Records from other years are ignored.
pub fn build_source_array(records: &[SourceRecord], year: i32) -> Vec<u32> {
    let mut counts = vec![0u32; days_in_year(year)];
    for record in records {
        let day = record.day();
        if day.year() == year {
            counts[day.ordinal0() as usize] += 1;
        }
    }
    counts
}

/// Lay out a count array on the calendar grid
///
/// `counts[i]` is the count for day `i` of the year. A shorter array is padded
/// with zeros and extra entries are ignored.
pub fn build_year_heatmap(counts: &[u32], year: i32, month_lines: bool) -> Result<YearHeatmap> {
    let days = date_range(year_start(year)?, year_end(year)?);

    let cells: Vec<HeatmapCell> = days
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let count = counts.get(i).copied().unwrap_or(0);
            let label = format_label(*date);
            HeatmapCell {
                date: *date,
                week: week_column(*date),
                weekday: date.weekday().num_days_from_monday(),
                count,
                hover: format!("{} sources read on {}", count, label),
                label,
            }
        })
        .collect();

    let lines = if month_lines {
        month_boundaries(&cells)
    } else {
        Vec::new()
    };

    Ok(YearHeatmap {
        year,
        total: cells.iter().map(|c| c.count).sum(),
        max_count: cells.iter().map(|c| c.count).max().unwrap_or(0),
        cells,
        month_lines: lines,
        month_ticks: month_ticks(year),
        weekday_labels: WEEKDAY_NAMES,
    })
}

/// Heatmap of sources added in `year`
pub fn build_heatmap_from_items(items: &[ZoteroItem], year: i32) -> Result<YearHeatmap> {
    let in_range = extract_items_for_date(items, DateFilter::Since(year_start(year)?))?;
    let records = to_source_records(in_range)?;
    let counts = build_source_array(&records, year);
    build_year_heatmap(&counts, year, true)
}

/// One heatmap per requested year, in the order given
pub fn build_multi_year_heatmap(records: &[SourceRecord], years: &[i32]) -> Result<Vec<YearHeatmap>> {
    years
        .iter()
        .map(|year| build_year_heatmap(&build_source_array(records, *year), *year, true))
        .collect()
}

// Outline each month: a vertical line left of the week holding the 1st and,
// when the 1st is mid-week, a step around the days before it.
fn month_boundaries(cells: &[HeatmapCell]) -> Vec<Segment> {
    let mut segments = Vec::new();
    for cell in cells.iter().filter(|c| c.date.day() == 1) {
        let w = cell.week as f64;
        let dow = cell.weekday as f64;

        segments.push(Segment {
            x: [w - 0.5, w - 0.5],
            y: [dow - 0.5, 6.5],
        });
        if cell.weekday != 0 {
            segments.push(Segment {
                x: [w - 0.5, w + 0.5],
                y: [dow - 0.5, dow - 0.5],
            });
            segments.push(Segment {
                x: [w + 0.5, w + 0.5],
                y: [dow - 0.5, -0.5],
            });
        }
    }
    segments
}

fn month_ticks(year: i32) -> Vec<MonthTick> {
    let mut elapsed = 0u32;
    month_lengths(year)
        .iter()
        .zip(MONTH_NAMES)
        .map(|(days, label)| {
            elapsed += days;
            MonthTick {
                label,
                position: (elapsed as f64 - 15.0) / 7.0,
            }
        })
        .collect()
}
