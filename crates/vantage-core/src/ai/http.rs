//! Answering service backed by the CMDB API (`POST /api/ai/query`)

use async_trait::async_trait;
use tracing::debug;

use super::{Answer, AnswerService, QueryRequest};
use crate::backend::{BackendClient, AI_QUERY_PATH};
use crate::config::BackendConfig;
use crate::error::Result;

#[derive(Clone)]
pub struct HttpAnswerService {
    client: BackendClient,
}

impl HttpAnswerService {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        Ok(Self {
            client: BackendClient::new(config)?,
        })
    }

    pub fn with_client(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, query: &str) -> Result<Answer> {
        debug!(host = self.client.base_url(), chars = query.len(), "Sending AI query");
        let request = QueryRequest {
            query: query.to_string(),
        };
        self.client.post_json(AI_QUERY_PATH, &request).await
    }

    async fn health_check(&self) -> bool {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "http"
    }
}
