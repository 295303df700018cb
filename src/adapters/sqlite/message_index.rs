//! Message similarity index backed by the `message_embeddings` table.
//!
//! Vectors are stored as little-endian `f32` blobs and scored in process
//! with cosine similarity.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::format_datetime;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SimilarPassage;
use crate::domain::ports::SimilarityIndex;

#[derive(Clone)]
pub struct SqliteMessageIndex {
    pool: SqlitePool,
}

impl SqliteMessageIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn embedding_to_bytes(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn bytes_to_embedding(bytes: &[u8]) -> DomainResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(DomainError::SerializationError(
            "invalid embedding bytes length".to_string(),
        ));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Cosine similarity, or `None` when dimensions differ or either vector is zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}

#[async_trait]
impl SimilarityIndex for SqliteMessageIndex {
    async fn index(&self, message_id: Uuid, vector: &[f32]) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO message_embeddings (message_id, embedding, created_at) VALUES (?, ?, ?)
               ON CONFLICT(message_id) DO UPDATE SET embedding = excluded.embedding"#
        )
        .bind(message_id.to_string())
        .bind(embedding_to_bytes(vector))
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn search(&self, vector: &[f32], k: usize) -> DomainResult<Vec<SimilarPassage>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let rows: Vec<(Vec<u8>, String, String)> = sqlx::query_as(
            r#"SELECT e.embedding, m.content, m.role
               FROM message_embeddings e JOIN messages m ON m.id = e.message_id"#
        )
        .fetch_all(&self.pool)
        .await?;

        let mut scored = Vec::with_capacity(rows.len());
        for (bytes, text, role) in rows {
            let stored = bytes_to_embedding(&bytes)?;
            if let Some(score) = cosine_similarity(vector, &stored) {
                scored.push(SimilarPassage { text, role, score });
            }
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteConversationRepository};
    use crate::domain::models::{Conversation, Message};
    use crate::domain::ports::ConversationRepository;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!(cosine_similarity(&[1.0], &[1.0, 0.0]).is_none());
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_blob_encoding() {
        let vector = vec![0.25_f32, -1.5, 3.0];
        assert_eq!(bytes_to_embedding(&embedding_to_bytes(&vector)).unwrap(), vector);
        assert!(bytes_to_embedding(&[0, 1, 2]).is_err());
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let pool = create_migrated_test_pool().await.unwrap();
        let conversations = SqliteConversationRepository::new(pool.clone());
        let index = SqliteMessageIndex::new(pool);

        let conversation = Conversation::new(None);
        conversations.create(&conversation).await.unwrap();
        let close = Message::user(conversation.id, "I worry about money");
        let far = Message::user(conversation.id, "The weather was nice");
        conversations.append_message(&close).await.unwrap();
        conversations.append_message(&far).await.unwrap();

        index.index(close.id, &[0.9, 0.1]).await.unwrap();
        index.index(far.id, &[0.0, 1.0]).await.unwrap();

        let results = index.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "I worry about money");
        assert_eq!(results[0].role, "user");
    }
}
