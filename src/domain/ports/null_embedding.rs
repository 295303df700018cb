//! Null embedding provider implementation.
//!
//! Used when no embedding backend is configured. It never reports ready, so
//! context assembly skips passage retrieval entirely.

use async_trait::async_trait;

use super::embedding::{EmbeddingMode, EmbeddingProvider};
use crate::domain::errors::{DomainError, DomainResult};

/// A no-op embedding provider that is never ready.
#[derive(Debug, Clone, Default)]
pub struct NullEmbeddingProvider;

impl NullEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    fn name(&self) -> &'static str {
        "null"
    }

    fn dimension(&self) -> usize {
        0
    }

    fn is_ready(&self) -> bool {
        false
    }

    async fn embed(&self, _text: &str, _mode: EmbeddingMode) -> DomainResult<Vec<f32>> {
        Err(DomainError::CollaboratorUnavailable(
            "no embedding provider configured".to_string(),
        ))
    }
}
