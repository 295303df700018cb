//! Integration tests for context assembly over a real message index.

mod common;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use rapport::adapters::sqlite::{SqliteConversationRepository, SqliteMessageIndex};
use rapport::domain::errors::DomainResult;
use rapport::domain::models::{ContextConfig, Conversation, Message, ValueType};
use rapport::domain::ports::{
    ConversationRepository, EmbeddingMode, EmbeddingProvider, NullEmbeddingProvider, SimilarityIndex,
};
use rapport::services::ContextAssembler;

/// Embeds text onto two axes: talk about work and talk about family.
struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn dimension(&self) -> usize {
        2
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn embed(&self, text: &str, _mode: EmbeddingMode) -> DomainResult<Vec<f32>> {
        let text = text.to_lowercase();
        let work = if text.contains("work") || text.contains("boss") { 1.0 } else { 0.0 };
        let family = if text.contains("family") || text.contains("mum") { 1.0 } else { 0.0 };
        Ok(vec![work, family])
    }
}

#[tokio::test]
async fn test_empty_profile_yields_empty_context() {
    let h = common::harness().await;
    let assembler = ContextAssembler::new(
        h.signals.clone(),
        h.profile.clone(),
        Arc::new(NullEmbeddingProvider::new()),
        Arc::new(SqliteMessageIndex::new(h.pool.clone())),
        ContextConfig::default(),
    );

    let context = assembler.assemble("hello", &[], Uuid::new_v4()).await.unwrap();
    assert!(context.profile_summary.is_empty());
    assert!(context.relevant_passages.is_empty());
    assert!(context.recent_history_text.is_empty());
    assert_eq!(context.size_estimate, 0);
}

#[tokio::test]
async fn test_passages_come_from_indexed_messages() {
    let h = common::harness().await;
    let conversations = SqliteConversationRepository::new(h.pool.clone());
    let index = Arc::new(SqliteMessageIndex::new(h.pool.clone()));
    let embedder = Arc::new(KeywordEmbedder);

    let conversation = Conversation::new(None);
    conversations.create(&conversation).await.unwrap();
    for text in ["My boss keeps moving deadlines at work", "My mum visited the family home"] {
        let message = Message::user(conversation.id, text);
        conversations.append_message(&message).await.unwrap();
        let vector = embedder.embed(text, EmbeddingMode::Document).await.unwrap();
        index.index(message.id, &vector).await.unwrap();
    }

    let assembler = ContextAssembler::new(
        h.signals.clone(),
        h.profile.clone(),
        embedder,
        index,
        ContextConfig::default(),
    );
    let context = assembler
        .assemble("work is stressing me out", &[], conversation.id)
        .await
        .unwrap();

    assert!(!context.relevant_passages.is_empty());
    assert_eq!(context.relevant_passages[0].text, "My boss keeps moving deadlines at work");
    assert_eq!(context.relevant_passages[0].role, "user");
}

#[tokio::test]
async fn test_summary_respects_confidence_floor_and_size_estimate() {
    let h = common::harness().await;
    h.observe("growth_mindset", "believes skills grow").await;
    h.profile
        .record_value("honesty", ValueType::Stated, common::grounding("honesty matters most"))
        .await
        .unwrap();

    let config = ContextConfig {
        confidence_floor: 0.7,
        ..ContextConfig::default()
    };
    let assembler = ContextAssembler::new(
        h.signals.clone(),
        h.profile.clone(),
        Arc::new(NullEmbeddingProvider::new()),
        Arc::new(SqliteMessageIndex::new(h.pool.clone())),
        config,
    );

    let context = assembler.assemble("hi", &[], Uuid::new_v4()).await.unwrap();
    assert!(context.profile_summary.contains("## Core values"));
    assert!(context.profile_summary.contains("honesty"));
    assert!(!context.profile_summary.contains("growth_mindset"), "0.6 is under the 0.7 floor");

    let chars = context.format_for_prompt().chars().count();
    assert!(context.size_estimate >= chars / 4);
}
