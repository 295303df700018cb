use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Conversation, Message};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create(&self, conversation: &Conversation) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Conversation>>;

    /// Conversations, most recently updated first.
    async fn list(&self) -> DomainResult<Vec<Conversation>>;

    /// Delete a conversation and its messages.
    ///
    /// # Errors
    /// Returns `ConversationNotFound` if no such conversation exists.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Append a message and bump the conversation's `updated_at`.
    async fn append_message(&self, message: &Message) -> DomainResult<()>;

    async fn get_message(&self, id: Uuid) -> DomainResult<Option<Message>>;

    /// The last `limit` messages of a conversation in chronological order.
    async fn recent_messages(&self, conversation_id: Uuid, limit: usize) -> DomainResult<Vec<Message>>;
}
