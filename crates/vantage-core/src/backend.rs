//! HTTP client for the CMDB backend
//!
//! The backend computes statistics and answers natural-language queries;
//! this client only moves JSON. Non-success responses become
//! `Error::Service` with the human-readable detail the backend put in the
//! body, if any.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::snapshot::StatSnapshot;

pub const STATS_PATH: &str = "/api/dashboard/stats";
pub const AI_QUERY_PATH: &str = "/api/ai/query";
pub const HEALTH_PATH: &str = "/health";

/// Longest plain-text body used verbatim as an error detail
const MAX_TEXT_DETAIL: usize = 300;

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl BackendClient {
    /// Create a client; the timeout applies to every request
    pub fn new(config: &BackendConfig) -> Result<Self> {
        // Trailing slash so joined paths keep any prefix (http://host/cmdb/)
        let base_url = Url::parse(&format!("{}/", config.url.trim_end_matches('/')))?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Fetch the dashboard statistics snapshot
    pub async fn fetch_stats(&self) -> Result<StatSnapshot> {
        let url = self.endpoint(STATS_PATH)?;
        debug!(url = %url, "Fetching dashboard stats");
        let value: Value = self.send(self.http.get(url)).await?;
        Ok(StatSnapshot::from_value(value))
    }

    /// POST a JSON body and decode the JSON response
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send(self.http.post(url).json(body)).await
    }

    /// Check if the backend is reachable
    pub async fn health_check(&self) -> bool {
        let Ok(url) = self.endpoint(HEALTH_PATH) else {
            return false;
        };
        match self.http.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Backend health check failed");
                false
            }
        }
    }

    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json::<R>().await?)
    }
}

/// Turn a non-success response into `Error::Service`
async fn error_from_response(response: Response) -> Error {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(status, error = %e, "Failed to read error body");
            String::new()
        }
    };
    let detail = extract_detail(&body);
    warn!(status, detail = detail.as_deref().unwrap_or(""), "Backend request failed");
    Error::Service { status, detail }
}

/// Pull a human-readable message out of an error body
///
/// Understands `{"detail": "..."}`, validation lists
/// (`{"detail": [{"msg": "..."}]}`), `{"error": "..."}`/`{"message": "..."}`
/// and short plain-text bodies.
pub fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(obj)) => ["detail", "error", "message"]
            .iter()
            .filter_map(|key| obj.get(*key))
            .find_map(detail_from_value),
        Ok(Value::String(s)) => non_empty(&s),
        Ok(_) => None,
        Err(_) if trimmed.len() <= MAX_TEXT_DETAIL && !trimmed.starts_with('<') => {
            Some(trimmed.to_string())
        }
        Err(_) => None,
    }
}

fn detail_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(|item| {
            item.get("msg")
                .and_then(Value::as_str)
                .and_then(non_empty)
                .or_else(|| item.as_str().and_then(non_empty))
        }),
        Value::Object(obj) => obj.get("message").and_then(Value::as_str).and_then(non_empty),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
