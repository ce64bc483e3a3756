//! Chart and report models for Vantage views

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analytics::colors::Color;
use crate::analytics::drilldown::DrillDownTarget;
use crate::snapshot::LifecycleStatus;

// ========== Chart Rows ==========

/// A single chart-ready row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LifecycleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl ChartRow {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            status: None,
            color: None,
        }
    }

    pub fn with_status(mut self, status: LifecycleStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A row of a stacked chart: one outer category split by column
///
/// Only the columns present in the source are stored; `value` reads a missing
/// column as 0. Serializes flat as `{name, total, <column>: value, ...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedRow {
    pub name: String,
    pub total: f64,
    pub values: Vec<(String, f64)>,
}

impl StackedRow {
    /// Value of a column, 0 when the row has no entry for it
    pub fn value(&self, column: &str) -> f64 {
        self.values
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| *v)
            .unwrap_or(0.0)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.values.iter().any(|(c, _)| c == column)
    }
}

impl Serialize for StackedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 2))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("total", &self.total)?;
        for (column, value) in &self.values {
            // A column literally named "name" or "total" would shadow the row fields
            if column == "name" || column == "total" {
                continue;
            }
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Stacked chart data: rows plus the union of their columns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackedBreakdown {
    /// Union of all column keys, in first-seen order
    pub columns: Vec<String>,
    pub rows: Vec<StackedRow>,
}

/// A stacked series with its display color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub color: Color,
}

/// Measure used when summarizing a sequence of rows
pub trait Measured {
    fn label(&self) -> &str;
    fn measure(&self) -> f64;
}

impl Measured for ChartRow {
    fn label(&self) -> &str {
        &self.name
    }

    fn measure(&self) -> f64 {
        self.value
    }
}

impl Measured for StackedRow {
    fn label(&self) -> &str {
        &self.name
    }

    fn measure(&self) -> f64 {
        self.total
    }
}

// ========== Summaries ==========

/// Top driver and global total of a sorted row sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub top_driver: Option<String>,
    pub top_value: f64,
    pub total: f64,
    /// Share of the top driver in `total` (0.0..=1.0); absent when total is 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_share: Option<f64>,
}

impl Summary {
    pub fn has_data(&self) -> bool {
        self.top_driver.is_some()
    }

    /// One-line description for headers and terminal output
    pub fn describe(&self) -> String {
        match (&self.top_driver, self.top_share) {
            (None, _) => "no data".to_string(),
            (Some(driver), Some(share)) => format!(
                "{} leads with {} ({:.1}% of {})",
                driver,
                format_amount(self.top_value),
                share * 100.0,
                format_amount(self.total)
            ),
            (Some(driver), None) => format!("{} leads; total is 0", driver),
        }
    }
}

/// Whole numbers without decimals, everything else with two
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// A single month in the growth series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub month: String,
    pub count: f64,
}

/// Growth trend in snapshot (chronological) order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrowthSeries {
    pub points: Vec<GrowthPoint>,
    pub total: f64,
    pub average: f64,
    /// First month with the highest count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<GrowthPoint>,
}

// ========== Views ==========

/// SLA compliance view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlaView {
    pub rows: Vec<ChartRow>,
    pub summary: Summary,
    pub total_cis: f64,
}

/// Cost distribution view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostView {
    pub by_center: Vec<ChartRow>,
    pub stacked: StackedBreakdown,
    pub series: Vec<Series>,
    /// Summary over the stacked rows when present, else over `by_center`
    pub summary: Summary,
}

/// Growth trend view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthView {
    pub series: GrowthSeries,
    pub color: Color,
}

/// OS/DB distribution view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OsDbView {
    /// Every row, zero-valued ones included
    pub rows: Vec<ChartRow>,
    /// Number of rows with a non-zero value
    pub total_items: usize,
    pub total_cis: f64,
    pub end_of_life_count: f64,
    pub unapproved_count: f64,
    pub summary: Summary,
}

/// Inventory overview (headline counters plus type/status breakdowns)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewView {
    pub total_cis: u64,
    pub active_cis: u64,
    pub inactive_cis: u64,
    pub recent_imports: u64,
    pub by_type: Vec<ChartRow>,
    pub by_status: Vec<ChartRow>,
}

/// A clicked row resolved into its navigation target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillDown {
    pub row: String,
    pub target: DrillDownTarget,
    pub route: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(42.0), "42");
        assert_eq!(format_amount(3400.5), "3400.50");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_stacked_row_serializes_flat() {
        let row = StackedRow {
            name: "A".to_string(),
            total: 150.0,
            values: vec![("db".to_string(), 100.0), ("server".to_string(), 50.0)],
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":"A","total":150.0,"db":100.0,"server":50.0}"#);
    }

    #[test]
    fn test_stacked_row_missing_column_reads_zero() {
        let row = StackedRow {
            name: "B".to_string(),
            total: 20.0,
            values: vec![("db".to_string(), 20.0)],
        };
        assert_eq!(row.value("server"), 0.0);
        assert!(!row.has_column("server"));
    }

    #[test]
    fn test_summary_describe() {
        assert_eq!(Summary::default().describe(), "no data");

        let summary = Summary {
            top_driver: Some("Finance".to_string()),
            top_value: 150.0,
            total: 200.0,
            top_share: Some(0.75),
        };
        assert_eq!(summary.describe(), "Finance leads with 150 (75.0% of 200)");

        let zero = Summary {
            top_driver: Some("Idle".to_string()),
            top_value: 0.0,
            total: 0.0,
            top_share: None,
        };
        assert_eq!(zero.describe(), "Idle leads; total is 0");
    }

    #[test]
    fn test_chart_row_skips_empty_optionals() {
        let json = serde_json::to_string(&ChartRow::new("Gold", 5.0)).unwrap();
        assert_eq!(json, r#"{"name":"Gold","value":5.0}"#);
    }
}
