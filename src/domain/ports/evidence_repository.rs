use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Evidence, EvidenceTarget};

/// Append-only evidence log.
#[async_trait]
pub trait EvidenceRepository: Send + Sync {
    /// Append a standalone evidence row.
    async fn append(&self, evidence: &Evidence) -> DomainResult<()>;

    /// Evidence whose target matches any of `target_ids`, oldest first.
    ///
    /// Signal evidence has been written keyed by signal id and by raw
    /// dimension key, so callers pass both.
    async fn list_for_targets(
        &self,
        target_type: EvidenceTarget,
        target_ids: &[String],
    ) -> DomainResult<Vec<Evidence>>;

    /// Delete every evidence row. Only used by a full profile reset.
    async fn delete_all(&self) -> DomainResult<u64>;
}
