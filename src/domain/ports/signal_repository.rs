use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Evidence, Signal};

/// Repository trait for signal storage.
///
/// Signals are unique per dimension key. Writes always travel together with
/// the evidence row that justifies them.
#[async_trait]
pub trait SignalRepository: Send + Sync {
    /// Get the signal stored for a dimension key.
    async fn get_by_dimension(&self, dimension: &str) -> DomainResult<Option<Signal>>;

    /// Get a signal by its internal id.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Signal>>;

    /// List signals whose dimension starts with `prefix`, highest confidence first.
    ///
    /// An empty prefix lists every signal.
    async fn list_by_prefix(&self, prefix: &str) -> DomainResult<Vec<Signal>>;

    /// Insert or update `signal` and append `evidence` in one transaction.
    ///
    /// # Errors
    /// Returns error if the database operation fails; neither write is kept.
    async fn save_with_evidence(&self, signal: &Signal, evidence: &Evidence) -> DomainResult<()>;

    /// Delete every signal. Only used by a full profile reset.
    async fn delete_all(&self) -> DomainResult<u64>;
}
