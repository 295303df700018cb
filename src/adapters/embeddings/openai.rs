//! OpenAI embedding provider adapter.
//!
//! Talks to the `/v1/embeddings` endpoint of OpenAI or any compatible
//! server. Query and document text can carry different prefixes for models
//! trained with asymmetric inputs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::EmbeddingsConfig;
use crate::domain::ports::{EmbeddingMode, EmbeddingProvider};

/// Configuration for the OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingConfig {
    /// API key. Falls back to `OPENAI_API_KEY` env var.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub dimension: usize,
    pub timeout_secs: u64,
    pub query_prefix: String,
    pub document_prefix: String,
}

impl Default for OpenAiEmbeddingConfig {
    fn default() -> Self {
        Self::from(&EmbeddingsConfig::default())
    }
}

impl From<&EmbeddingsConfig> for OpenAiEmbeddingConfig {
    fn from(config: &EmbeddingsConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
            query_prefix: config.query_prefix.clone(),
            document_prefix: config.document_prefix.clone(),
        }
    }
}

impl OpenAiEmbeddingConfig {
    fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|key| !key.trim().is_empty()))
    }

    fn prefix(&self, mode: EmbeddingMode) -> &str {
        match mode {
            EmbeddingMode::Query => &self.query_prefix,
            EmbeddingMode::Document => &self.document_prefix,
        }
    }
}

/// OpenAI embedding provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiEmbeddingConfig,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiEmbeddingConfig) -> DomainResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DomainError::ExecutionFailed(format!("Failed to build HTTP client: {e}")))?;
        let api_key = config.resolve_api_key();
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    async fn call_embeddings_api(&self, input: String) -> DomainResult<Vec<f32>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            DomainError::CollaboratorUnavailable(
                "OpenAI API key not set. Set OPENAI_API_KEY env var or configure embeddings.api_key."
                    .to_string(),
            )
        })?;
        let url = format!("{}/embeddings", self.config.base_url);

        let request_body = EmbeddingsRequest {
            model: self.config.model.clone(),
            input: vec![input],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DomainError::CollaboratorUnavailable(format!("Embedding API request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(DomainError::CollaboratorUnavailable(format!(
                "Embedding API returned {status}: {body}"
            )));
        }

        let result: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| DomainError::SerializationError(format!("Failed to parse embedding response: {e}")))?;

        let mut data = result.data;
        data.sort_by_key(|d| d.index);

        data.into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::ExecutionFailed("Empty embedding response".to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }

    async fn embed(&self, text: &str, mode: EmbeddingMode) -> DomainResult<Vec<f32>> {
        let input = format!("{}{}", self.config.prefix(mode), text);
        tracing::debug!(mode = mode.as_str(), chars = input.chars().count(), "Requesting embedding");
        self.call_embeddings_api(input).await
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}
