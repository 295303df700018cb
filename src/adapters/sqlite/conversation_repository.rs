//! SQLite implementation of the ConversationRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_datetime, parse_datetime, parse_enum, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Conversation, Message, MessageRole};
use crate::domain::ports::ConversationRepository;

#[derive(Clone)]
pub struct SqliteConversationRepository {
    pool: SqlitePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for SqliteConversationRepository {
    async fn create(&self, conversation: &Conversation) -> DomainResult<()> {
        sqlx::query("INSERT INTO conversations (id, title, created_at, updated_at) VALUES (?, ?, ?, ?)")
            .bind(conversation.id.to_string())
            .bind(&conversation.title)
            .bind(format_datetime(&conversation.created_at))
            .bind(format_datetime(&conversation.updated_at))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Conversation>> {
        let row: Option<ConversationRow> = sqlx::query_as("SELECT * FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Conversation>> {
        let rows: Vec<ConversationRow> = sqlx::query_as("SELECT * FROM conversations ORDER BY updated_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConversationNotFound(id));
        }
        Ok(())
    }

    async fn append_message(&self, message: &Message) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&message.created_at))
            .bind(message.conversation_id.to_string())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConversationNotFound(message.conversation_id));
        }

        sqlx::query(
            "INSERT INTO messages (id, conversation_id, role, content, created_at) VALUES (?, ?, ?, ?, ?)"
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_message(&self, id: Uuid) -> DomainResult<Option<Message>> {
        let row: Option<MessageRow> = sqlx::query_as("SELECT * FROM messages WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn recent_messages(&self, conversation_id: Uuid, limit: usize) -> DomainResult<Vec<Message>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"SELECT * FROM (
                   SELECT *, rowid AS seq FROM messages WHERE conversation_id = ?
                   ORDER BY created_at DESC, rowid DESC LIMIT ?
               ) ORDER BY created_at ASC, seq ASC"#
        )
        .bind(conversation_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: String,
    title: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = DomainError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        Ok(Conversation {
            id: parse_uuid(&row.id)?,
            title: row.title,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = DomainError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: parse_uuid(&row.id)?,
            conversation_id: parse_uuid(&row.conversation_id)?,
            role: parse_enum("role", &row.role, MessageRole::from_str)?,
            content: row.content,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteConversationRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteConversationRepository::new(pool)
    }

    #[tokio::test]
    async fn test_recent_messages_are_chronological() {
        let repo = setup_test_repo().await;
        let conversation = Conversation::new(Some("Evening chat".to_string()));
        repo.create(&conversation).await.unwrap();

        for i in 0..5 {
            repo.append_message(&Message::user(conversation.id, format!("message {i}")))
                .await
                .unwrap();
        }

        let recent = repo.recent_messages(conversation.id, 3).await.unwrap();
        let contents: Vec<_> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["message 2", "message 3", "message 4"]);
    }

    #[tokio::test]
    async fn test_append_to_missing_conversation_fails() {
        let repo = setup_test_repo().await;
        let err = repo
            .append_message(&Message::user(Uuid::new_v4(), "hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ConversationNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_messages() {
        let repo = setup_test_repo().await;
        let conversation = Conversation::new(None);
        repo.create(&conversation).await.unwrap();
        let message = Message::assistant(conversation.id, "hi there");
        repo.append_message(&message).await.unwrap();

        repo.delete(conversation.id).await.unwrap();
        assert!(repo.get(conversation.id).await.unwrap().is_none());
        assert!(repo.get_message(message.id).await.unwrap().is_none());

        let err = repo.delete(conversation.id).await.unwrap_err();
        assert!(matches!(err, DomainError::ConversationNotFound(_)));
    }
}
