//! Aggregation engine
//!
//! Pure functions turning one `StatSnapshot` into chart-ready sequences.
//! Every function is total: empty or missing input yields empty output and
//! "no data" summaries, never an error.
//!
//! Ordering rules:
//! - grouped rows sort descending by value, ties keep snapshot order
//! - stacked columns are the union of inner keys in first-seen order
//! - growth data keeps snapshot (chronological) order and is never re-sorted

pub mod colors;
pub mod drilldown;
pub mod views;

pub use colors::{color_for, Color, ColorKey, Ruleset};
pub use drilldown::{drill_down_target, Dimension, DrillDownTarget};
pub use views::{cost_view, growth_view, os_db_view, overview, sla_view};

use crate::models::{ChartRow, GrowthPoint, GrowthSeries, Measured, StackedBreakdown, StackedRow, Summary};
use crate::snapshot::{Breakdown, Breakdown2D};

/// One row per entry, sorted descending by value (stable)
pub fn group_and_sort(breakdown: &Breakdown) -> Vec<ChartRow> {
    let mut rows: Vec<ChartRow> = breakdown
        .iter()
        .map(|(name, value)| ChartRow::new(name, value))
        .collect();
    sort_descending(&mut rows);
    rows
}

/// Sum each outer row and collect the union of inner columns
pub fn stack_by_dimension(breakdown: &Breakdown2D) -> StackedBreakdown {
    let mut columns: Vec<String> = Vec::new();
    for (_, inner) in breakdown.iter() {
        for key in inner.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }

    let mut rows: Vec<StackedRow> = breakdown
        .iter()
        .map(|(name, inner)| StackedRow {
            name: name.to_string(),
            total: inner.total(),
            values: inner.iter().map(|(k, v)| (k.to_string(), v)).collect(),
        })
        .collect();
    sort_descending(&mut rows);

    StackedBreakdown { columns, rows }
}

/// Top driver (row 0) and global total of an already sorted sequence
pub fn summarize<R: Measured>(rows: &[R]) -> Summary {
    let total: f64 = rows.iter().map(Measured::measure).sum();
    match rows.first() {
        None => Summary::default(),
        Some(top) => {
            let top_value = top.measure();
            Summary {
                top_driver: Some(top.label().to_string()),
                top_value,
                total,
                top_share: (total != 0.0).then(|| top_value / total),
            }
        }
    }
}

/// Monthly counts in snapshot order with derived totals
pub fn growth_series(monthly: &Breakdown) -> GrowthSeries {
    let points: Vec<GrowthPoint> = monthly
        .iter()
        .map(|(month, count)| GrowthPoint {
            month: month.to_string(),
            count,
        })
        .collect();

    let total: f64 = points.iter().map(|p| p.count).sum();
    let average = if points.is_empty() {
        0.0
    } else {
        total / points.len() as f64
    };

    // First strict maximum so ties resolve to the earliest month
    let peak = points
        .iter()
        .fold(None::<&GrowthPoint>, |best, p| match best {
            Some(b) if b.count >= p.count => Some(b),
            _ => Some(p),
        })
        .cloned();

    GrowthSeries {
        points,
        total,
        average,
        peak,
    }
}

fn sort_descending<R: Measured>(rows: &mut [R]) {
    // sort_by is stable; total_cmp keeps the order deterministic even for NaN
    rows.sort_by(|a, b| b.measure().total_cmp(&a.measure()));
}
