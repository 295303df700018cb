//! Context assembly for the response generator.
//!
//! Renders the profile into section-labelled text, retrieves similar past
//! passages when the embedder is ready, and appends recent history. Retrieval
//! problems never fail the assembly; they only leave the passages empty.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::profile_store::ProfileStore;
use super::signal_store::SignalStore;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    estimate_size, is_known_dimension, AssembledContext, Axis, AxisTier, ContextConfig,
    IntentObservation, Message, Signal, SimilarPassage, BIG_FIVE_PREFIX, LIFE_SITUATION_PREFIX,
    MORAL_PREFIX,
};
use crate::domain::ports::{EmbeddingMode, EmbeddingProvider, SimilarityIndex};

pub struct ContextAssembler {
    signals: Arc<SignalStore>,
    profile: Arc<ProfileStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
    config: ContextConfig,
}

fn push_section(summary: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    if !summary.is_empty() {
        summary.push('\n');
    }
    let _ = writeln!(summary, "## {title}");
    for line in lines {
        let _ = writeln!(summary, "- {line}");
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

impl ContextAssembler {
    pub fn new(
        signals: Arc<SignalStore>,
        profile: Arc<ProfileStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
        config: ContextConfig,
    ) -> Self {
        Self {
            signals,
            profile,
            embedder,
            index,
            config,
        }
    }

    pub async fn assemble(
        &self,
        current_message: &str,
        recent_messages: &[Message],
        conversation_id: Uuid,
    ) -> DomainResult<AssembledContext> {
        let support_style = self.signals.get(Axis::SupportSeekingStyle.as_str()).await?;
        let current_intent = self.profile.current_intent(conversation_id).await?;
        let profile_summary = self.profile_summary(support_style.as_ref(), current_intent.as_ref()).await?;
        let relevant_passages = self.retrieve_passages(current_message).await;
        let recent_history_text = self.history_text(recent_messages);

        let mut context = AssembledContext {
            profile_summary,
            relevant_passages,
            recent_history_text,
            size_estimate: 0,
            support_style,
            current_intent,
        };
        let total_chars = context.profile_summary.chars().count()
            + context.passages_text().chars().count()
            + context.recent_history_text.chars().count();
        context.size_estimate = estimate_size(total_chars);

        tracing::debug!(
            conversation_id = %conversation_id,
            passages = context.relevant_passages.len(),
            size_estimate = context.size_estimate,
            "Context assembled"
        );
        Ok(context)
    }

    async fn profile_summary(
        &self,
        support_style: Option<&Signal>,
        current_intent: Option<&IntentObservation>,
    ) -> DomainResult<String> {
        let floor = self.config.confidence_floor;
        let above_floor = |signals: Vec<Signal>| -> Vec<String> {
            signals
                .into_iter()
                .filter(|s| s.confidence >= floor)
                .map(|s| format!("{}: {} (confidence {:.2})", s.leaf(), s.value, s.confidence))
                .collect()
        };

        let mut summary = String::new();

        let values: Vec<String> = self
            .profile
            .top_values(self.config.value_limit)
            .await?
            .iter()
            .map(|v| format!("{} ({}, confidence {:.2})", v.name, v.value_type.as_str(), v.confidence))
            .collect();
        push_section(&mut summary, "Core values", &values);

        let challenges: Vec<String> = self
            .profile
            .active_challenges(self.config.challenge_limit)
            .await?
            .iter()
            .map(|c| format!("{} (mentioned {}x)", c.description, c.mention_count))
            .collect();
        push_section(&mut summary, "Current challenges", &challenges);

        let maslow: Vec<String> = self
            .profile
            .recent_maslow(self.config.maslow_limit)
            .await?
            .iter()
            .map(|m| format!("{} {}: {}", m.level.as_str(), m.observation_type.as_str(), m.description))
            .collect();
        push_section(&mut summary, "Needs", &maslow);

        let goals: Vec<String> = self
            .profile
            .open_goals(self.config.goal_limit)
            .await?
            .iter()
            .map(|g| format!("{} [{}]", g.description, g.status.as_str()))
            .collect();
        push_section(&mut summary, "Goals", &goals);

        let support: Vec<String> = support_style
            .map(|s| format!("{} (confidence {:.2})", s.value, s.confidence))
            .into_iter()
            .collect();
        push_section(&mut summary, "Support style", &support);

        let intent: Vec<String> = current_intent
            .map(|i| {
                if i.description.is_empty() {
                    i.intent_type.as_str().to_string()
                } else {
                    format!("{}: {}", i.intent_type.as_str(), i.description)
                }
            })
            .into_iter()
            .collect();
        push_section(&mut summary, "Current intent", &intent);

        let life: Vec<String> = self
            .signals
            .list(LIFE_SITUATION_PREFIX)
            .await?
            .iter()
            .map(|s| format!("{}: {}", s.leaf(), s.value))
            .collect();
        push_section(&mut summary, "Life situation", &life);

        let tracked = |signals: Vec<Signal>| -> Vec<Signal> {
            signals.into_iter().filter(|s| is_known_dimension(&s.dimension)).collect()
        };
        push_section(&mut summary, "Moral foundations", &above_floor(tracked(self.signals.list(MORAL_PREFIX).await?)));
        push_section(&mut summary, "Personality traits", &above_floor(tracked(self.signals.list(BIG_FIVE_PREFIX).await?)));

        let mut dispositions = Vec::new();
        for axis in Axis::ALL.iter().filter(|a| {
            a.is_single_signal() && matches!(a.tier(), AxisTier::Disposition | AxisTier::Nuance)
        }) {
            if let Some(signal) = self.signals.get(axis.as_str()).await? {
                dispositions.push(signal);
            }
        }
        push_section(&mut summary, "Dispositions", &above_floor(dispositions));

        Ok(summary)
    }

    /// Top similar passages for the current message, or nothing.
    async fn retrieve_passages(&self, current_message: &str) -> Vec<SimilarPassage> {
        if !self.embedder.is_ready() || current_message.trim().is_empty() || self.config.passage_limit == 0 {
            return Vec::new();
        }

        let timeout = Duration::from_millis(self.config.retrieval_timeout_ms);
        let lookup = async {
            let vector = self.embedder.embed(current_message, EmbeddingMode::Query).await?;
            self.index.search(&vector, self.config.passage_limit).await
        };

        let result = match tokio::time::timeout(timeout, lookup).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::CollaboratorUnavailable(format!(
                "passage retrieval timed out after {}ms",
                self.config.retrieval_timeout_ms
            ))),
        };

        match result {
            Ok(passages) => passages
                .into_iter()
                .take(self.config.passage_limit)
                .map(|p| SimilarPassage {
                    text: truncate_chars(&p.text, self.config.passage_chars),
                    ..p
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Passage retrieval failed, continuing without passages");
                Vec::new()
            }
        }
    }

    fn history_text(&self, recent_messages: &[Message]) -> String {
        let skip = recent_messages.len().saturating_sub(self.config.history_messages);
        let window = &recent_messages[skip..];
        if window.is_empty() {
            return String::new();
        }

        let mut text = String::from("## Recent conversation\n");
        for message in window {
            let _ = writeln!(text, "{}: {}", message.role.label(), message.content);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteEvidenceRepository, SqliteProfileRepository,
        SqliteSignalRepository,
    };
    use crate::domain::models::{Grounding, SignalObservation, ValueType};
    use crate::domain::ports::NullEmbeddingProvider;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn dimension(&self) -> usize {
            2
        }
        fn is_ready(&self) -> bool {
            true
        }
        async fn embed(&self, _: &str, _: EmbeddingMode) -> DomainResult<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }
    }

    struct SlowEmbedder;

    #[async_trait]
    impl EmbeddingProvider for SlowEmbedder {
        fn name(&self) -> &'static str {
            "slow"
        }
        fn dimension(&self) -> usize {
            2
        }
        fn is_ready(&self) -> bool {
            true
        }
        async fn embed(&self, _: &str, _: EmbeddingMode) -> DomainResult<Vec<f32>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![1.0, 0.0])
        }
    }

    struct CannedIndex(Vec<SimilarPassage>);

    #[async_trait]
    impl SimilarityIndex for CannedIndex {
        async fn index(&self, _: Uuid, _: &[f32]) -> DomainResult<()> {
            Ok(())
        }
        async fn search(&self, _: &[f32], k: usize) -> DomainResult<Vec<SimilarPassage>> {
            Ok(self.0.iter().take(k).cloned().collect())
        }
    }

    async fn stores() -> (Arc<SignalStore>, Arc<ProfileStore>) {
        let pool = create_migrated_test_pool().await.unwrap();
        let profile_repo = Arc::new(SqliteProfileRepository::new(pool.clone()));
        let signals = Arc::new(SignalStore::new(
            Arc::new(SqliteSignalRepository::new(pool.clone())),
            Arc::new(SqliteEvidenceRepository::new(pool)),
            profile_repo.clone(),
        ));
        let profile = Arc::new(ProfileStore::new(profile_repo, signals.write_lock()));
        (signals, profile)
    }

    fn passage(text: &str) -> SimilarPassage {
        SimilarPassage {
            text: text.to_string(),
            role: "user".to_string(),
            score: 0.9,
        }
    }

    #[tokio::test]
    async fn test_empty_profile_assembles_empty_context() {
        let (signals, profile) = stores().await;
        let assembler = ContextAssembler::new(
            signals,
            profile,
            Arc::new(NullEmbeddingProvider::new()),
            Arc::new(CannedIndex(vec![passage("never returned")])),
            ContextConfig::default(),
        );

        let context = assembler.assemble("hello", &[], Uuid::new_v4()).await.unwrap();
        assert!(context.profile_summary.is_empty());
        assert!(context.relevant_passages.is_empty());
        assert!(context.recent_history_text.is_empty());
        assert_eq!(context.size_estimate, 0);
    }

    #[tokio::test]
    async fn test_profile_sections_are_rendered() {
        let (signals, profile) = stores().await;
        let message_id = Uuid::new_v4();
        signals
            .upsert(SignalObservation::new("support_seeking_style", "listener").grounded("just listen", message_id))
            .await
            .unwrap();
        signals
            .upsert(SignalObservation::new("life_situation.work_status", "employed").grounded("at work", message_id))
            .await
            .unwrap();
        profile
            .record_value("family", ValueType::Stated, Some(Grounding::new("family first", message_id)))
            .await
            .unwrap();

        let assembler = ContextAssembler::new(
            signals,
            profile,
            Arc::new(NullEmbeddingProvider::new()),
            Arc::new(CannedIndex(Vec::new())),
            ContextConfig::default(),
        );
        let context = assembler.assemble("hi", &[], Uuid::new_v4()).await.unwrap();

        assert!(context.profile_summary.contains("## Core values\n- family (stated"));
        assert!(context.profile_summary.contains("## Life situation\n- work_status: employed"));
        assert!(context.profile_summary.contains("## Support style\n- listener"));
        assert_eq!(context.support_style.unwrap().value, "listener");
        assert!(context.size_estimate > 0);
    }

    #[tokio::test]
    async fn test_passages_are_truncated_and_limited() {
        let (signals, profile) = stores().await;
        let long = "x".repeat(500);
        let assembler = ContextAssembler::new(
            signals,
            profile,
            Arc::new(FixedEmbedder),
            Arc::new(CannedIndex(vec![passage(&long), passage("b"), passage("c"), passage("d")])),
            ContextConfig::default(),
        );

        let context = assembler.assemble("money worries", &[], Uuid::new_v4()).await.unwrap();
        assert_eq!(context.relevant_passages.len(), 3);
        assert_eq!(context.relevant_passages[0].text.chars().count(), 200);
    }

    #[tokio::test]
    async fn test_slow_retrieval_degrades_to_empty() {
        let (signals, profile) = stores().await;
        let config = ContextConfig {
            retrieval_timeout_ms: 20,
            ..ContextConfig::default()
        };
        let assembler = ContextAssembler::new(
            signals,
            profile,
            Arc::new(SlowEmbedder),
            Arc::new(CannedIndex(vec![passage("a")])),
            config,
        );

        let context = assembler.assemble("anything", &[], Uuid::new_v4()).await.unwrap();
        assert!(context.relevant_passages.is_empty());
    }

    #[tokio::test]
    async fn test_history_keeps_last_ten_messages() {
        let (signals, profile) = stores().await;
        let conversation_id = Uuid::new_v4();
        let messages: Vec<Message> = (0..12)
            .map(|i| Message::user(conversation_id, format!("line {i}")))
            .collect();
        let assembler = ContextAssembler::new(
            signals,
            profile,
            Arc::new(NullEmbeddingProvider::new()),
            Arc::new(CannedIndex(Vec::new())),
            ContextConfig::default(),
        );

        let context = assembler.assemble("", &messages, conversation_id).await.unwrap();
        assert!(!context.recent_history_text.contains("line 1\n"));
        assert!(context.recent_history_text.contains("User: line 2\n"));
        assert!(context.recent_history_text.contains("User: line 11\n"));
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
