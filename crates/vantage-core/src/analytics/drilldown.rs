//! Drill-down targets for chart rows
//!
//! Clicking a chart row navigates to the CI list filtered by that row. The
//! engine only computes the filter; translating it into a route is the
//! caller's job (`DrillDownTarget::route` is a convenience for the CI list).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::DrillDown;

/// Dimension a view is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sla,
    CostCenter,
    Software,
    CiType,
    Status,
}

impl Dimension {
    /// Query parameter name on the CI list
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sla => "sla",
            Self::CostCenter => "cost_center",
            Self::Software => "software",
            Self::CiType => "ci_type",
            Self::Status => "status",
        }
    }

    pub fn all() -> &'static [Dimension] {
        &[
            Self::Sla,
            Self::CostCenter,
            Self::Software,
            Self::CiType,
            Self::Status,
        ]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "sla" => Ok(Self::Sla),
            "cost_center" | "cost" => Ok(Self::CostCenter),
            "software" | "os_db" => Ok(Self::Software),
            "ci_type" | "type" => Ok(Self::CiType),
            "status" => Ok(Self::Status),
            _ => Err(format!(
                "Unknown dimension: {} (valid: sla, cost-center, software, ci-type, status)",
                s
            )),
        }
    }
}

/// Filter to apply on the CI list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillDownTarget {
    pub dimension: Dimension,
    pub value: String,
}

impl DrillDownTarget {
    /// Encoded query string, e.g. `sla=Gold` or `cost_center=R%26D`
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair(self.dimension.as_str(), &self.value)
            .finish()
    }

    /// Route to the CI list with this filter
    pub fn route(&self) -> String {
        format!("/cis?{}", self.query_string())
    }
}

/// Map a clicked row to its navigation filter
pub fn drill_down_target(row_name: &str, dimension: Dimension) -> DrillDownTarget {
    DrillDownTarget {
        dimension,
        value: row_name.to_string(),
    }
}

impl DrillDown {
    /// Resolve a row into its filter and CI list route
    pub fn new(row_name: &str, dimension: Dimension) -> Self {
        let target = drill_down_target(row_name, dimension);
        let route = target.route();
        Self {
            row: row_name.to_string(),
            target,
            route,
        }
    }
}
