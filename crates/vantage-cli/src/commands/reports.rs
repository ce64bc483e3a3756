//! Report command implementations
//!
//! Each view renders to a string first so tests can inspect the output.

use anyhow::Result;
use vantage_core::{
    cost_view, format_amount, growth_view, os_db_view, overview, sla_view, ChartRow, CostView,
    GrowthView, OsDbView, OverviewView, SlaView, StatSnapshot, Summary,
};

use super::{print_json, truncate};
use crate::cli::ReportView;

const RULE: &str = "   ─────────────────────────────────────────────────────────────";
const BAR_WIDTH: usize = 24;
const NAME_WIDTH: usize = 25;

pub fn cmd_report(snapshot: &StatSnapshot, view: ReportView, json: bool) -> Result<()> {
    let snapshot = Some(snapshot);
    match view {
        ReportView::Sla => {
            let view = sla_view(snapshot);
            if json {
                return print_json(&view);
            }
            print!("{}", render_sla(&view));
        }
        ReportView::Cost => {
            let view = cost_view(snapshot);
            if json {
                return print_json(&view);
            }
            print!("{}", render_cost(&view));
        }
        ReportView::Growth => {
            let view = growth_view(snapshot);
            if json {
                return print_json(&view);
            }
            print!("{}", render_growth(&view));
        }
        ReportView::OsDb => {
            let view = os_db_view(snapshot);
            if json {
                return print_json(&view);
            }
            print!("{}", render_os_db(&view));
        }
        ReportView::Overview => {
            let view = overview(snapshot);
            if json {
                return print_json(&view);
            }
            print!("{}", render_overview(&view));
        }
    }
    Ok(())
}

pub fn render_sla(view: &SlaView) -> String {
    let mut lines = header("📊 SLA Compliance");
    if view.rows.is_empty() {
        lines.push("   No SLA data available.".to_string());
        return finish(lines);
    }

    lines.push(format!("   Total CIs: {}", format_amount(view.total_cis)));
    lines.push(String::new());
    lines.extend(bar_table("SLA Tier", "CIs", &view.rows));
    lines.push(String::new());
    lines.push(summary_line(&view.summary));
    finish(lines)
}

pub fn render_cost(view: &CostView) -> String {
    let mut lines = header("💰 Cost by Cost Center");
    if view.by_center.is_empty() && view.stacked.rows.is_empty() {
        lines.push("   No cost data available.".to_string());
        return finish(lines);
    }

    if !view.by_center.is_empty() {
        lines.extend(bar_table("Cost Center", "Cost", &view.by_center));
        lines.push(String::new());
    }

    if !view.stacked.rows.is_empty() {
        lines.push("   By CI type:".to_string());
        let mut head = format!("   {:20} │ {:>10}", "Cost Center", "Total");
        for column in &view.stacked.columns {
            head.push_str(&format!(" │ {:>10}", truncate(column, 10)));
        }
        lines.push(head);
        for row in &view.stacked.rows {
            let mut line = format!(
                "   {:20} │ {:>10}",
                truncate(&row.name, 20),
                format_amount(row.total)
            );
            for column in &view.stacked.columns {
                line.push_str(&format!(" │ {:>10}", format_amount(row.value(column))));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    lines.push(summary_line(&view.summary));
    finish(lines)
}

pub fn render_growth(view: &GrowthView) -> String {
    let mut lines = header("📈 CI Growth by Month");
    let series = &view.series;
    if series.points.is_empty() {
        lines.push("   No growth data available.".to_string());
        return finish(lines);
    }

    let max = series.points.iter().map(|p| p.count).fold(0.0, f64::max);
    lines.push(format!("   {:12} │ {:>8} │", "Month", "CIs"));
    for point in &series.points {
        lines.push(format!(
            "   {:12} │ {:>8} │ {}",
            truncate(&point.month, 12),
            format_amount(point.count),
            bar(point.count, max)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "   Total: {}   Average: {:.1}/month",
        format_amount(series.total),
        series.average
    ));
    if let Some(peak) = &series.peak {
        lines.push(format!(
            "   Peak: {} ({})",
            peak.month,
            format_amount(peak.count)
        ));
    }
    finish(lines)
}

pub fn render_os_db(view: &OsDbView) -> String {
    let mut lines = header("💿 OS / Database Distribution");
    if view.rows.is_empty() {
        lines.push("   No OS/DB data available.".to_string());
        return finish(lines);
    }

    lines.push(format!(
        "   {:25} │ {:>8} │ {:12} │",
        "Product", "CIs", "Status"
    ));
    let max = max_value(&view.rows);
    for row in &view.rows {
        let status = row
            .status
            .as_ref()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "   {:25} │ {:>8} │ {:12} │ {}",
            truncate(&row.name, NAME_WIDTH),
            format_amount(row.value),
            truncate(&status, 12),
            bar(row.value, max)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "   Products in use: {}   Total CIs: {}",
        view.total_items,
        format_amount(view.total_cis)
    ));
    if view.end_of_life_count > 0.0 {
        lines.push(format!(
            "   ⚠️  End of life: {}",
            format_amount(view.end_of_life_count)
        ));
    }
    if view.unapproved_count > 0.0 {
        lines.push(format!(
            "   ⚠️  Unapproved: {}",
            format_amount(view.unapproved_count)
        ));
    }
    lines.push(summary_line(&view.summary));
    finish(lines)
}

pub fn render_overview(view: &OverviewView) -> String {
    let mut lines = header("🗄️  CMDB Overview");
    lines.push(format!("   Total CIs:      {}", view.total_cis));
    lines.push(format!("   Active:         {}", view.active_cis));
    lines.push(format!("   Inactive:       {}", view.inactive_cis));
    lines.push(format!("   Recent imports: {}", view.recent_imports));

    if !view.by_type.is_empty() {
        lines.push(String::new());
        lines.extend(bar_table("CI Type", "CIs", &view.by_type));
    }
    if !view.by_status.is_empty() {
        lines.push(String::new());
        lines.extend(bar_table("Status", "CIs", &view.by_status));
    }
    finish(lines)
}

fn header(title: &str) -> Vec<String> {
    vec![String::new(), title.to_string(), RULE.to_string()]
}

fn finish(mut lines: Vec<String>) -> String {
    lines.push(String::new());
    lines.join("\n")
}

fn bar_table(name_title: &str, value_title: &str, rows: &[ChartRow]) -> Vec<String> {
    let max = max_value(rows);
    let mut lines = vec![format!(
        "   {:25} │ {:>10} │",
        name_title, value_title
    )];
    for row in rows {
        lines.push(format!(
            "   {:25} │ {:>10} │ {}",
            truncate(&row.name, NAME_WIDTH),
            format_amount(row.value),
            bar(row.value, max)
        ));
    }
    lines
}

fn summary_line(summary: &Summary) -> String {
    format!("   Top: {}", summary.describe())
}

fn max_value(rows: &[ChartRow]) -> f64 {
    rows.iter().map(|r| r.value).fold(0.0, f64::max)
}

/// Horizontal bar scaled against `max`
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}
