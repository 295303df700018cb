//! Domain errors for the rapport profile engine.

use thiserror::Error;
use uuid::Uuid;

/// Domain-level errors that can occur in the profile engine.
///
/// Ungrounded observations and unknown axes are deliberately absent: both are
/// handled as non-error outcomes by the services that encounter them.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Signal not found: {0}")]
    SignalNotFound(String),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Challenge not found: {0}")]
    ChallengeNotFound(Uuid),

    #[error("Goal not found: {0}")]
    GoalNotFound(Uuid),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
