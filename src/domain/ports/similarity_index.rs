//! Vector similarity search port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::SimilarPassage;

/// Returns stored passages most similar to a query vector.
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Store (or replace) the document vector for a message.
    async fn index(&self, message_id: Uuid, vector: &[f32]) -> DomainResult<()>;

    /// Top-`k` passages ordered by descending score.
    async fn search(&self, vector: &[f32], k: usize) -> DomainResult<Vec<SimilarPassage>>;
}
