//! Integration tests for vantage-core
//!
//! These tests exercise the full snapshot → views → drill-down workflow and
//! the assistant session through the public API.

use vantage_core::analytics::colors::{
    END_OF_LIFE, PALETTE, SEVERITY_1, SEVERITY_2, SEVERITY_3, SUPPORTED, UNAPPROVED,
};
use vantage_core::{
    cost_view, growth_view, os_db_view, overview, sla_view, AnswerClient, Config, Dimension,
    DrillDown, LifecycleStatus, MockAnswerService, Phase, QuerySession, Sender, StatSnapshot,
};

/// A dashboard payload shaped like the backend's response, including the
/// quirks the parser has to tolerate (string counters, pair lists, junk)
fn dashboard_json() -> &'static str {
    r#"{
        "total_cis": 120,
        "active_cis": 100,
        "inactive_cis": 20,
        "recent_imports": "4",
        "cis_by_type": {"Server": 60, "Database": 25, "Application": 35},
        "cis_by_status": [["Active", 100], ["Inactive", 20]],
        "cis_by_sla": {"Gold": 5, "Bronze": 10, "Silver": 10, "Unknown": "n/a"},
        "cost_by_cost_center": {"Finance": 1200, "Engineering": 3400.5, "HR": 0},
        "cost_by_center_and_type": {
            "Finance": {"Database": 800, "Server": 400},
            "Engineering": {"Server": 2000.5, "Application": 1400},
            "HR": {}
        },
        "cis_by_os_db": {"Ubuntu 22.04": 9},
        "os_db_details": [
            {"name": "Ubuntu 22.04", "value": 9, "status": "Supported"},
            {"name": "Windows Server 2012", "value": 4, "status": "End of Life"},
            {"name": "Oracle 11g", "value": 4, "status": "unapproved"},
            {"name": "CentOS 6", "value": 0, "status": "EOL"},
            {"name": "broken entry"}
        ],
        "growth_by_month": [
            {"month": "2024-01", "count": 30},
            {"month": "2024-02", "count": 45},
            {"month": "2024-03", "count": 45}
        ]
    }"#
}

fn dashboard() -> StatSnapshot {
    StatSnapshot::from_json_str(dashboard_json()).expect("valid dashboard JSON")
}

fn names(rows: &[vantage_core::ChartRow]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

// =============================================================================
// Dashboard Workflow Tests
// =============================================================================

#[test]
fn test_snapshot_tolerates_backend_quirks() {
    let snapshot = dashboard();

    assert_eq!(snapshot.total_cis, 120);
    assert_eq!(snapshot.recent_imports, 4);
    assert_eq!(snapshot.cis_by_status.get("Inactive"), Some(20.0));
    // Non-numeric SLA entry is skipped, the rest keep their order
    let tiers: Vec<&str> = snapshot.cis_by_sla.keys().collect();
    assert_eq!(tiers, vec!["Gold", "Bronze", "Silver"]);
    // Entry without a value is dropped
    assert_eq!(snapshot.os_db_details.len(), 4);
    assert_eq!(snapshot.growth_by_month.len(), 3);
}

#[test]
fn test_sla_view_sorted_and_colored() {
    let view = sla_view(Some(&dashboard()));

    // Bronze and Silver tie; snapshot order decides
    assert_eq!(names(&view.rows), vec!["Bronze", "Silver", "Gold"]);
    let colors: Vec<_> = view.rows.iter().map(|r| r.color).collect();
    assert_eq!(colors, vec![Some(SEVERITY_3), Some(SEVERITY_2), Some(SEVERITY_1)]);
    assert_eq!(view.total_cis, 25.0);
    assert_eq!(view.summary.top_driver.as_deref(), Some("Bronze"));
    assert_eq!(view.summary.top_share, Some(0.4));
}

#[test]
fn test_cost_view_stacks_by_type() {
    let view = cost_view(Some(&dashboard()));

    assert_eq!(names(&view.by_center), vec!["Engineering", "Finance", "HR"]);
    assert_eq!(view.stacked.columns, vec!["Database", "Server", "Application"]);
    assert_eq!(view.series.len(), 3);
    assert_eq!(view.series[0].color, PALETTE[0]);

    let engineering = &view.stacked.rows[0];
    assert_eq!(engineering.name, "Engineering");
    assert_eq!(engineering.total, 3400.5);
    assert_eq!(engineering.value("Database"), 0.0);

    // Every leaf is counted exactly once
    let stacked_total: f64 = view.stacked.rows.iter().map(|r| r.total).sum();
    assert_eq!(stacked_total, 4600.5);
    assert_eq!(view.summary.total, 4600.5);
    assert_eq!(view.summary.top_driver.as_deref(), Some("Engineering"));
}

#[test]
fn test_growth_view_keeps_chronology() {
    let view = growth_view(Some(&dashboard()));
    let months: Vec<&str> = view.series.points.iter().map(|p| p.month.as_str()).collect();

    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(view.series.total, 120.0);
    assert_eq!(view.series.average, 40.0);
    // Ties resolve to the earliest month
    assert_eq!(view.series.peak.as_ref().map(|p| p.month.as_str()), Some("2024-02"));
}

#[test]
fn test_os_db_view_lifecycle() {
    let view = os_db_view(Some(&dashboard()));

    assert_eq!(view.rows.len(), 4);
    assert_eq!(view.total_items, 3);
    assert_eq!(view.total_cis, 17.0);
    assert_eq!(view.end_of_life_count, 4.0);
    assert_eq!(view.unapproved_count, 4.0);

    let windows = view.rows.iter().find(|r| r.name == "Windows Server 2012").unwrap();
    assert_eq!(windows.status, Some(LifecycleStatus::EndOfLife));
    assert_eq!(windows.color, Some(END_OF_LIFE));

    let oracle = view.rows.iter().find(|r| r.name == "Oracle 11g").unwrap();
    assert_eq!(oracle.color, Some(UNAPPROVED));

    let centos = view.rows.iter().find(|r| r.name == "CentOS 6").unwrap();
    assert_eq!(centos.status, Some(LifecycleStatus::EndOfLife));
    assert_eq!(view.rows[0].color, Some(SUPPORTED));
}

#[test]
fn test_overview_counters() {
    let view = overview(Some(&dashboard()));

    assert_eq!(view.total_cis, 120);
    assert_eq!(view.active_cis, 100);
    assert_eq!(view.inactive_cis, 20);
    assert_eq!(names(&view.by_type), vec!["Server", "Application", "Database"]);
    assert_eq!(names(&view.by_status), vec!["Active", "Inactive"]);
}

#[test]
fn test_views_are_idempotent() {
    let snapshot = dashboard();
    assert_eq!(sla_view(Some(&snapshot)), sla_view(Some(&snapshot)));
    assert_eq!(cost_view(Some(&snapshot)), cost_view(Some(&snapshot)));
    assert_eq!(growth_view(Some(&snapshot)), growth_view(Some(&snapshot)));
    assert_eq!(os_db_view(Some(&snapshot)), os_db_view(Some(&snapshot)));
    assert_eq!(overview(Some(&snapshot)), overview(Some(&snapshot)));
}

#[test]
fn test_missing_snapshot_renders_empty_views() {
    assert!(sla_view(None).rows.is_empty());
    assert_eq!(cost_view(None).summary.describe(), "no data");
    assert!(growth_view(None).series.points.is_empty());
    assert_eq!(os_db_view(None).total_items, 0);
    assert_eq!(overview(None).total_cis, 0);

    // Non-object payloads degrade the same way
    let snapshot = StatSnapshot::from_json_str("[1, 2, 3]").unwrap();
    assert!(snapshot.is_empty());
    assert!(StatSnapshot::from_json_str("{not json").is_err());
}

#[test]
fn test_view_json_shape() {
    let view = cost_view(Some(&dashboard()));
    let json = serde_json::to_value(&view).unwrap();

    let first = &json["stacked"]["rows"][0];
    assert_eq!(first["name"], "Engineering");
    assert_eq!(first["Server"], 2000.5);
    assert!(first.get("Database").is_none());
    assert_eq!(json["by_center"][0]["color"], PALETTE[0].hex());
}

#[test]
fn test_drill_down_from_view_rows() {
    let view = os_db_view(Some(&dashboard()));
    let routes: Vec<String> = view
        .rows
        .iter()
        .map(|row| DrillDown::new(&row.name, Dimension::Software).route)
        .collect();

    assert_eq!(routes[0], "/cis?software=Ubuntu+22.04");
    assert!(routes.iter().all(|r| r.starts_with("/cis?software=")));
}

// =============================================================================
// Assistant Session Tests
// =============================================================================

#[tokio::test]
async fn test_session_conversation_with_mock_client() {
    let config = Config::default();
    let client = AnswerClient::mock();
    let mut session = QuerySession::from_config(&config.assistant);

    let reply = session.ask(&client, "How many servers?").await.unwrap();
    assert_eq!(reply.sender, Sender::Assistant);
    assert!(reply.text.contains("servers"));

    assert!(session.ask(&client, "").await.is_none());

    let senders: Vec<Sender> = session.messages().iter().map(|m| m.sender).collect();
    assert_eq!(senders, vec![Sender::Assistant, Sender::User, Sender::Assistant]);
    assert_eq!(session.messages()[0].text, config.assistant.welcome_message);
}

#[tokio::test]
async fn test_session_failures_stay_in_conversation() {
    let config = Config::default();
    let service = MockAnswerService::new()
        .with_failure(501, "AI service is not configured (Missing GEMINI_API_KEY)")
        .with_bare_failure(502)
        .with_answer("There are 12 servers.");
    let mut session = QuerySession::from_config(&config.assistant);

    let first = session.ask(&service, "list servers").await.unwrap().text.clone();
    assert_eq!(first, "AI service is not configured (Missing GEMINI_API_KEY)");

    let second = session.ask(&service, "list servers").await.unwrap().text.clone();
    assert_eq!(second, config.assistant.fallback_message);

    let third = session.ask(&service, "list servers").await.unwrap().text.clone();
    assert_eq!(third, "There are 12 servers.");

    assert_eq!(session.phase(), &Phase::Idle);
    assert_eq!(session.messages().len(), 7);
    assert_eq!(service.call_count(), 3);
}

#[test]
fn test_session_ticket_serializes_exchanges() {
    let mut session = QuerySession::new("hi", "sorry");
    let ticket = session.submit("first question").unwrap();

    // No overlapping requests
    assert!(session.submit("second question").is_none());
    assert!(session.is_pending());

    session
        .complete(ticket, Ok(vantage_core::Answer::new("first answer")))
        .unwrap();
    assert!(!session.is_pending());
    assert_eq!(session.messages().len(), 3);
}
