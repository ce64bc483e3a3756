//! Per-view derivations
//!
//! Each builder takes the snapshot as `Option` so a view whose fetch has not
//! completed (or failed) renders empty instead of erroring.

use tracing::debug;

use super::colors::{lifecycle_color, palette_color, severity_color};
use super::{group_and_sort, growth_series, stack_by_dimension, summarize};
use crate::models::{ChartRow, CostView, GrowthView, OsDbView, OverviewView, Series, SlaView};
use crate::snapshot::{LifecycleStatus, StatSnapshot};

/// SLA tiers sorted by CI count, colored by severity keyword
pub fn sla_view(snapshot: Option<&StatSnapshot>) -> SlaView {
    let Some(snapshot) = snapshot else {
        return SlaView::default();
    };

    let rows: Vec<ChartRow> = group_and_sort(&snapshot.cis_by_sla)
        .into_iter()
        .map(|row| {
            let color = severity_color(&row.name);
            row.with_color(color)
        })
        .collect();
    let summary = summarize(&rows);
    debug!(tiers = rows.len(), total = summary.total, "Derived SLA view");

    SlaView {
        total_cis: summary.total,
        rows,
        summary,
    }
}

/// Cost per center, plus the center x CI-type stacked breakdown
pub fn cost_view(snapshot: Option<&StatSnapshot>) -> CostView {
    let Some(snapshot) = snapshot else {
        return CostView::default();
    };

    let by_center: Vec<ChartRow> = palette_rows(group_and_sort(&snapshot.cost_by_cost_center));
    let stacked = stack_by_dimension(&snapshot.cost_by_center_and_type);
    let series = stacked
        .columns
        .iter()
        .enumerate()
        .map(|(i, key)| Series {
            key: key.clone(),
            color: palette_color(i),
        })
        .collect();

    let summary = if stacked.rows.is_empty() {
        summarize(&by_center)
    } else {
        summarize(&stacked.rows)
    };
    debug!(
        centers = by_center.len(),
        stacked_rows = stacked.rows.len(),
        columns = stacked.columns.len(),
        "Derived cost view"
    );

    CostView {
        by_center,
        stacked,
        series,
        summary,
    }
}

/// Monthly growth in chronological order
pub fn growth_view(snapshot: Option<&StatSnapshot>) -> GrowthView {
    let series = snapshot
        .map(|s| growth_series(&s.growth_by_month))
        .unwrap_or_default();
    debug!(months = series.points.len(), total = series.total, "Derived growth view");

    GrowthView {
        series,
        color: palette_color(0),
    }
}

/// OS/DB products colored by lifecycle status
///
/// Rows come from the detailed list when the backend sends one, otherwise
/// from the plain label -> count breakdown with an unknown status.
/// `total_items` skips zero-valued rows while `rows` keeps them.
pub fn os_db_view(snapshot: Option<&StatSnapshot>) -> OsDbView {
    let Some(snapshot) = snapshot else {
        return OsDbView::default();
    };

    let mut rows: Vec<ChartRow> = if snapshot.os_db_details.is_empty() {
        group_and_sort(&snapshot.cis_by_os_db)
            .into_iter()
            .map(|row| row.with_status(LifecycleStatus::default()))
            .collect()
    } else {
        snapshot
            .os_db_details
            .iter()
            .map(|entry| ChartRow::new(&entry.name, entry.value).with_status(entry.status.clone()))
            .collect()
    };
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));

    let rows: Vec<ChartRow> = rows
        .into_iter()
        .map(|row| {
            let color = lifecycle_color(row.status.as_ref().unwrap_or(&LifecycleStatus::default()));
            row.with_color(color)
        })
        .collect();

    let total_items = rows.iter().filter(|r| r.value != 0.0).count();
    let sum_status = |wanted: &LifecycleStatus| -> f64 {
        rows.iter()
            .filter(|r| r.status.as_ref() == Some(wanted))
            .map(|r| r.value)
            .sum()
    };
    let end_of_life_count = sum_status(&LifecycleStatus::EndOfLife);
    let unapproved_count = sum_status(&LifecycleStatus::Unapproved);
    let summary = summarize(&rows);
    debug!(products = rows.len(), total_items, "Derived OS/DB view");

    OsDbView {
        total_items,
        total_cis: summary.total,
        end_of_life_count,
        unapproved_count,
        summary,
        rows,
    }
}

/// Headline counters with CI type and status breakdowns
pub fn overview(snapshot: Option<&StatSnapshot>) -> OverviewView {
    let Some(snapshot) = snapshot else {
        return OverviewView::default();
    };

    OverviewView {
        total_cis: snapshot.total_cis,
        active_cis: snapshot.active_cis,
        inactive_cis: snapshot.inactive_cis,
        recent_imports: snapshot.recent_imports,
        by_type: palette_rows(group_and_sort(&snapshot.cis_by_type)),
        by_status: palette_rows(group_and_sort(&snapshot.cis_by_status)),
    }
}

fn palette_rows(rows: Vec<ChartRow>) -> Vec<ChartRow> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| row.with_color(palette_color(i)))
        .collect()
}
