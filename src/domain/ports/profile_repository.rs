use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Challenge, ChallengeStatus, Evidence, Goal, IntentObservation, IntentType, MaslowObservation,
    Value,
};

/// Repository for the profile entities that sit beside signals.
///
/// `save_*`/`add_*` methods that take evidence persist both in one transaction.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find a value by normalized name.
    async fn find_value(&self, name: &str) -> DomainResult<Option<Value>>;

    async fn save_value(&self, value: &Value, evidence: &Evidence) -> DomainResult<()>;

    /// All values, highest confidence first.
    async fn list_values(&self) -> DomainResult<Vec<Value>>;

    /// Find a challenge by normalized description.
    async fn find_challenge(&self, description: &str) -> DomainResult<Option<Challenge>>;

    async fn get_challenge(&self, id: Uuid) -> DomainResult<Option<Challenge>>;

    async fn save_challenge(&self, challenge: &Challenge, evidence: Option<&Evidence>) -> DomainResult<()>;

    /// Challenges, most mentioned first, optionally filtered by status.
    async fn list_challenges(&self, status: Option<ChallengeStatus>) -> DomainResult<Vec<Challenge>>;

    /// Find a goal by normalized description.
    async fn find_goal(&self, description: &str) -> DomainResult<Option<Goal>>;

    async fn get_goal(&self, id: Uuid) -> DomainResult<Option<Goal>>;

    async fn save_goal(&self, goal: &Goal, evidence: Option<&Evidence>) -> DomainResult<()>;

    /// All goals, most recently seen first.
    async fn list_goals(&self) -> DomainResult<Vec<Goal>>;

    async fn add_maslow(&self, observation: &MaslowObservation, evidence: &Evidence) -> DomainResult<()>;

    /// Maslow observations, most recent first.
    async fn list_maslow(&self, limit: Option<usize>) -> DomainResult<Vec<MaslowObservation>>;

    async fn add_intent(&self, intent: &IntentObservation, evidence: &Evidence) -> DomainResult<()>;

    /// Distinct intent types observed across all conversations.
    async fn distinct_intent_types(&self) -> DomainResult<Vec<IntentType>>;

    /// Most recent intent recorded for a conversation.
    async fn latest_intent(&self, conversation_id: Uuid) -> DomainResult<Option<IntentObservation>>;

    /// Delete every entity. Only used by a full profile reset.
    async fn delete_all(&self) -> DomainResult<u64>;
}
