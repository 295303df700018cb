//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for semantic similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Whether text is being embedded as a search query or as a stored document.
///
/// Some models expect different prefixes for the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbeddingMode {
    Query,
    Document,
}

impl EmbeddingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Document => "document",
        }
    }
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "openai", "null").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Whether the provider can serve requests right now.
    fn is_ready(&self) -> bool;

    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> DomainResult<Vec<f32>>;
}
