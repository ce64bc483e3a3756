//! Vantage Core Library
//!
//! Shared functionality for the Vantage CMDB analytics tool:
//! - Statistics snapshot parsing (lenient, order-preserving)
//! - Chart derivation: grouping, sorting, stacking, coloring, summaries
//! - View builders for the SLA, cost, growth, OS/DB and overview reports
//! - Drill-down targets into the CI inventory
//! - Conversational query session over a pluggable answering service
//! - HTTP client for the CMDB backend
//! - Two-layer configuration (embedded defaults + user override + env)

pub mod ai;
pub mod analytics;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod snapshot;

/// Test utilities including a mock CMDB backend server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{Answer, AnswerClient, AnswerService, HttpAnswerService, MockAnswerService};
pub use analytics::{
    color_for, cost_view, drill_down_target, growth_series, growth_view, group_and_sort,
    os_db_view, overview, sla_view, stack_by_dimension, summarize, Color, ColorKey, Dimension,
    DrillDownTarget, Ruleset,
};
pub use backend::BackendClient;
pub use config::{AssistantBackend, AssistantConfig, BackendConfig, Config};
pub use error::{Error, Result};
pub use models::{
    format_amount, ChartRow, CostView, DrillDown, GrowthPoint, GrowthSeries, GrowthView, Measured,
    OsDbView, OverviewView, Series, SlaView, StackedBreakdown, StackedRow, Summary,
};
pub use session::{Message, PendingQuery, Phase, QuerySession, Sender};
pub use snapshot::{Breakdown, Breakdown2D, LifecycleStatus, OsDbEntry, StatSnapshot};
