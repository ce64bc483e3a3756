//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;
use vantage_core::test_utils::MockBackendServer;
use vantage_core::{
    cost_view, os_db_view, overview, sla_view, Config, Dimension, MockAnswerService,
    QuerySession, StatSnapshot,
};

use crate::cli::{Cli, Commands, ReportView};
use crate::commands::{self, truncate};

fn snapshot_from(json: &str) -> StatSnapshot {
    StatSnapshot::from_json_str(json).unwrap()
}

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{:?} not found in output:\n{}", needle, haystack))
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_report_with_global_flags() {
    let cli = Cli::try_parse_from(["vantage", "report", "os-db", "--json", "-v"]).unwrap();
    assert!(cli.json);
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::Report {
            view: ReportView::OsDb
        }
    ));
}

#[test]
fn test_parse_drill_dimension() {
    let cli = Cli::try_parse_from(["vantage", "drill", "cost-center", "R&D"]).unwrap();
    match cli.command {
        Commands::Drill { dimension, name } => {
            assert_eq!(dimension, Dimension::CostCenter);
            assert_eq!(name, "R&D");
        }
        _ => panic!("expected drill command"),
    }
}

#[test]
fn test_parse_rejects_unknown_view() {
    assert!(Cli::try_parse_from(["vantage", "report", "region"]).is_err());
    assert!(Cli::try_parse_from(["vantage", "drill", "region", "EU"]).is_err());
}

#[test]
fn test_parse_ask_options() {
    let cli = Cli::try_parse_from(["vantage", "ask", "--mock", "-q", "how many servers?"]).unwrap();
    match cli.command {
        Commands::Ask { query, mock } => {
            assert!(mock);
            assert_eq!(query.as_deref(), Some("how many servers?"));
        }
        _ => panic!("expected ask command"),
    }
}

// ========== Formatting Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("Windows Server 2012 R2 Datacenter", 12), "Windows S...");
    // Multi-byte names are cut on character boundaries
    assert_eq!(truncate("Überwachungsdienst", 8), "Überw...");
}

#[test]
fn test_bar() {
    assert_eq!(commands::bar(0.0, 10.0), "");
    assert_eq!(commands::bar(5.0, 0.0), "");
    assert_eq!(commands::bar(10.0, 10.0).chars().count(), 24);
    // Tiny values still get a visible bar
    assert_eq!(commands::bar(0.001, 1000.0).chars().count(), 1);
}

#[test]
fn test_mask_token() {
    assert_eq!(commands::mask_token("abc"), "****");
    assert_eq!(commands::mask_token("supersecret1234"), "****1234");
}

// ========== Report Rendering Tests ==========

#[test]
fn test_render_sla_sorted_descending() {
    let snapshot = snapshot_from(r#"{"cis_by_sla": {"Gold": 5, "Bronze": 10}}"#);
    let out = commands::render_sla(&sla_view(Some(&snapshot)));

    assert!(out.contains("SLA Compliance"));
    assert!(position(&out, "Bronze") < position(&out, "Gold"));
    assert!(out.contains("Total CIs: 15"));
    assert!(out.contains("Bronze leads with 10"));
}

#[test]
fn test_render_empty_views() {
    let empty = StatSnapshot::default();
    assert!(commands::render_sla(&sla_view(Some(&empty))).contains("No SLA data available."));
    assert!(commands::render_cost(&cost_view(Some(&empty))).contains("No cost data available."));
    assert!(commands::render_os_db(&os_db_view(None)).contains("No OS/DB data available."));

    let out = commands::render_overview(&overview(None));
    assert!(out.contains("Total CIs:      0"));
}

#[test]
fn test_render_cost_stacked_columns() {
    let snapshot = snapshot_from(
        r#"{"cost_by_center_and_type": {"A": {"db": 100, "server": 50}, "B": {"db": 20}}}"#,
    );
    let out = commands::render_cost(&cost_view(Some(&snapshot)));

    assert!(out.contains("By CI type:"));
    assert!(position(&out, "db") < position(&out, "server"));
    // Row B has no server cost and shows 0 in that column
    let row_b = out
        .lines()
        .find(|l| l.trim_start().starts_with("B "))
        .unwrap();
    assert!(row_b.trim_end().ends_with('0'));
    assert!(out.contains("A leads with 150"));
}

#[test]
fn test_render_os_db_flags_lifecycle() {
    let snapshot = snapshot_from(
        r#"{"os_db_details": [
            {"name": "Ubuntu 22.04", "value": 9, "status": "Supported"},
            {"name": "Windows Server 2012", "value": 4, "status": "End of Life"},
            {"name": "Oracle 11g", "value": 2, "status": "Unapproved"},
            {"name": "Solaris 10", "value": 0, "status": "End of Life"}
        ]}"#,
    );
    let view = os_db_view(Some(&snapshot));
    let out = commands::render_os_db(&view);

    assert!(out.contains("End of life: 4"));
    assert!(out.contains("Unapproved: 2"));
    assert!(out.contains("Products in use: 3"));
    // Zero-valued products are still listed
    assert!(out.contains("Solaris 10"));
}

#[test]
fn test_render_growth_keeps_month_order() {
    let snapshot = snapshot_from(r#"{"growth_by_month": {"2024-01": 3, "2024-02": 5}}"#);
    let out = commands::render_growth(&vantage_core::growth_view(Some(&snapshot)));

    assert!(position(&out, "2024-01") < position(&out, "2024-02"));
    assert!(out.contains("Total: 8"));
    assert!(out.contains("Peak: 2024-02 (5)"));
}

// ========== Snapshot Loading Tests ==========

#[tokio::test]
async fn test_load_snapshot_from_file() {
    let file = write_temp(r#"{"total_cis": 7, "cis_by_sla": {"Gold": 7}}"#, ".json");
    let snapshot = commands::load_snapshot(&Config::default(), Some(file.path()))
        .await
        .unwrap();
    assert_eq!(snapshot.total_cis, 7);
}

#[tokio::test]
async fn test_load_snapshot_missing_file() {
    let result = commands::load_snapshot(
        &Config::default(),
        Some(std::path::Path::new("/nonexistent/stats.json")),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_snapshot_from_backend() {
    let server = MockBackendServer::start().await;
    let mut config = Config::default();
    config.backend.url = server.url();
    config.backend.timeout = Duration::from_secs(5);

    let snapshot = commands::load_snapshot(&config, None).await.unwrap();
    assert_eq!(snapshot.total_cis, 42);
}

#[tokio::test]
async fn test_cmd_report_all_views_from_file() {
    let file = write_temp(
        &serde_json::to_string(&vantage_core::test_utils::sample_stats()).unwrap(),
        ".json",
    );
    let snapshot = commands::load_snapshot(&Config::default(), Some(file.path()))
        .await
        .unwrap();

    for view in [
        ReportView::Sla,
        ReportView::Cost,
        ReportView::Growth,
        ReportView::OsDb,
        ReportView::Overview,
    ] {
        assert!(commands::cmd_report(&snapshot, view, false).is_ok());
        assert!(commands::cmd_report(&snapshot, view, true).is_ok());
    }
}

// ========== Config Command Tests ==========

#[test]
fn test_load_config_missing_explicit_path() {
    let result = commands::load_config(Some(std::path::Path::new("/nonexistent/vantage.toml")), None);
    assert!(result.is_err());
}

#[test]
fn test_load_config_backend_flag_wins() {
    let file = write_temp("[backend]\nurl = \"http://file.local:9000\"\n", ".toml");
    let config = commands::load_config(Some(file.path()), Some("http://cli.local:1")).unwrap();
    assert_eq!(config.backend.url, "http://cli.local:1");
    assert_eq!(config.source.as_deref(), Some(file.path()));
    assert!(commands::cmd_config(&config, false).is_ok());
    assert!(commands::cmd_config(&config, true).is_ok());
}

// ========== Drill Command Tests ==========

#[test]
fn test_cmd_drill() {
    assert!(commands::cmd_drill(Dimension::Sla, "Gold", false).is_ok());
    assert!(commands::cmd_drill(Dimension::Software, "Oracle 11g", true).is_ok());
    assert!(commands::cmd_drill(Dimension::Status, "   ", false).is_err());
}

// ========== Ask Command Tests ==========

#[tokio::test]
async fn test_ask_and_format_failure_becomes_reply() {
    let mock = MockAnswerService::new().with_failure(500, "API key missing");
    let mut session = QuerySession::new("Hello!", "Sorry.");

    let reply = commands::ask_and_format(&mut session, &mock, "list servers")
        .await
        .unwrap();
    assert!(reply.ends_with("API key missing"));
    assert!(commands::ask_and_format(&mut session, &mock, "   ").await.is_none());
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_cmd_ask_once_with_mock() {
    let config = Config::default();
    assert!(commands::cmd_ask_once(&config, "how many servers?", true, false)
        .await
        .is_ok());
    assert!(commands::cmd_ask_once(&config, "how many servers?", true, true)
        .await
        .is_ok());
    assert!(commands::cmd_ask_once(&config, "  ", true, false).await.is_err());
}

#[tokio::test]
async fn test_cmd_ask_once_against_backend() {
    let server = MockBackendServer::start().await;
    let mut config = Config::default();
    config.backend.url = server.url();

    commands::cmd_ask_once(&config, "list servers", false, false)
        .await
        .unwrap();
    assert_eq!(server.queries(), vec!["list servers".to_string()]);
}

#[test]
fn test_answer_client_mock_flag() {
    use vantage_core::AnswerService;
    let client = commands::answer_client(&Config::default(), true).unwrap();
    assert_eq!(client.name(), "mock");
}
