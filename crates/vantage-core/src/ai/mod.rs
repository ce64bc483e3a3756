//! Natural-language answering service abstraction
//!
//! The assistant never interprets questions itself; it forwards them to an
//! answering service and shows what comes back.
//!
//! # Architecture
//!
//! - `AnswerService` trait: the single `ask` operation plus health/name
//! - `AnswerClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Implementations: `HttpAnswerService` (CMDB backend), `MockAnswerService`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::load(None)?;
//! let client = AnswerClient::from_config(&config)?;
//! let answer = client.ask("which servers run Oracle?").await?;
//! println!("{}", answer.answer);
//! ```

mod http;
mod mock;

pub use http::HttpAnswerService;
pub use mock::MockAnswerService;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{AssistantBackend, Config};
use crate::error::Result;

/// Request body for `POST /api/ai/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Response body of `POST /api/ai/query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
}

impl Answer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// Trait defining the interface for answering services
///
/// Implementations must be Send + Sync so a session can be driven from any
/// async task. Failures should carry a human-readable detail when the remote
/// side provides one (see `Error::detail`).
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Answer a single natural-language query
    async fn ask(&self, query: &str) -> Result<Answer>;

    /// Check if the service is reachable
    async fn health_check(&self) -> bool;

    /// Short name for logging
    fn name(&self) -> &str;
}

/// Concrete answering client
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AnswerClient {
    /// CMDB backend over HTTP
    Http(HttpAnswerService),
    /// Canned answers for tests and offline use
    Mock(MockAnswerService),
}

impl AnswerClient {
    /// Create the client selected by `assistant.backend`
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.assistant.backend {
            AssistantBackend::Http => Ok(Self::Http(HttpAnswerService::new(&config.backend)?)),
            AssistantBackend::Mock => Ok(Self::Mock(MockAnswerService::new())),
        }
    }

    /// Create a mock client for testing
    pub fn mock() -> Self {
        Self::Mock(MockAnswerService::new())
    }
}

#[async_trait]
impl AnswerService for AnswerClient {
    async fn ask(&self, query: &str) -> Result<Answer> {
        match self {
            Self::Http(service) => service.ask(query).await,
            Self::Mock(service) => service.ask(query).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            Self::Http(service) => service.health_check().await,
            Self::Mock(service) => service.health_check().await,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Http(service) => service.name(),
            Self::Mock(service) => service.name(),
        }
    }
}
