//! Test utilities for vantage-core
//!
//! A mock CMDB backend serving the stats, AI query and health endpoints on a
//! random local port. Used by unit tests and, through the `test-utils`
//! feature, by the CLI tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Json, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::{Answer, QueryRequest};
use crate::backend::{AI_QUERY_PATH, HEALTH_PATH, STATS_PATH};

/// Mock CMDB backend for tests
pub struct MockBackendServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Default)]
struct MockState {
    token: Option<String>,
    query_failure: Option<(u16, String)>,
    stats: Option<Value>,
    queries: Mutex<Vec<String>>,
}

/// Configures a `MockBackendServer` before it starts
#[derive(Default)]
pub struct MockBackendBuilder {
    state: MockState,
}

impl MockBackendBuilder {
    /// Reject requests without `Authorization: Bearer <token>`
    pub fn require_token(mut self, token: &str) -> Self {
        self.state.token = Some(token.to_string());
        self
    }

    /// Answer every AI query with this status and `{"detail": ...}`
    pub fn fail_queries(mut self, status: u16, detail: &str) -> Self {
        self.state.query_failure = Some((status, detail.to_string()));
        self
    }

    /// Serve this payload from the stats endpoint instead of the fixture
    pub fn stats(mut self, payload: Value) -> Self {
        self.state.stats = Some(payload);
        self
    }

    pub async fn start(self) -> MockBackendServer {
        let state = Arc::new(self.state);
        let app = Router::new()
            .route(STATS_PATH, get(handle_stats))
            .route(AI_QUERY_PATH, post(handle_query))
            .route(HEALTH_PATH, get(handle_health))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        MockBackendServer {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }
}

impl MockBackendServer {
    /// Start with the default fixture and no authentication
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// AI queries received so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.state
            .queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Snapshot served by the stats endpoint unless overridden
pub fn sample_stats() -> Value {
    json!({
        "total_cis": 42,
        "active_cis": 35,
        "inactive_cis": 7,
        "recent_imports": 3,
        "cis_by_type": {"Server": 20, "Database": 12, "Application": 10},
        "cis_by_status": {"Active": 35, "Inactive": 7},
        "cis_by_sla": {"Gold": 10, "Silver": 20, "Bronze": 12},
        "cost_by_cost_center": {"Finance": 1200.0, "Engineering": 3400.5},
        "cost_by_center_and_type": {
            "Finance": {"Server": 800.0, "Database": 400.0},
            "Engineering": {"Server": 2000.5, "Application": 1400.0}
        },
        "cis_by_os_db": {"Windows Server 2012": 4, "Ubuntu 22.04": 9, "Oracle 11g": 2},
        "os_db_details": [
            {"name": "Windows Server 2012", "value": 4, "status": "End of Life"},
            {"name": "Ubuntu 22.04", "value": 9, "status": "Supported"},
            {"name": "Oracle 11g", "value": 2, "status": "Unapproved"}
        ],
        "growth_by_month": {"2024-01": 30, "2024-02": 36, "2024-03": 42}
    })
}

fn authorized(state: &MockState, headers: &HeaderMap) -> bool {
    let Some(expected) = &state.token else {
        return true;
    };
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected)
}

fn detail_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

async fn handle_stats(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return detail_response(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let payload = state.stats.clone().unwrap_or_else(sample_stats);
    Json(payload).into_response()
}

async fn handle_query(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(request): Json<QueryRequest>,
) -> Response {
    if !authorized(&state, &headers) {
        return detail_response(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state
        .queries
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(request.query.clone());

    if let Some((status, detail)) = &state.query_failure {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return detail_response(status, detail);
    }
    Json(Answer::new(format!("You asked: {}", request.query))).into_response()
}

async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}
