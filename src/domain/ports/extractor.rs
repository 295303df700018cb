use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ExtractionBatch, Message};

/// Turns one user message into structured candidate observations.
#[async_trait]
pub trait ObservationExtractor: Send + Sync {
    async fn extract(&self, message: &Message) -> DomainResult<ExtractionBatch>;
}
