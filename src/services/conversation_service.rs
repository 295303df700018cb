//! One conversational turn, end to end.
//!
//! `prepare_turn` persists the user message, advances guided mode, picks a
//! question and assembles context. `complete_turn` persists the reply, starts
//! extraction in the background and indexes both messages for retrieval.

use std::fmt::Write as _;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::context_assembler::ContextAssembler;
use super::extraction_service::ExtractionService;
use super::guided_mode::GuidedModeController;
use super::question_bank::QuestionBank;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AssembledContext, Conversation, GuidedModeDecision, Message, Question};
use crate::domain::ports::{ConversationRepository, EmbeddingMode, EmbeddingProvider, Generator, SimilarityIndex};

const SYSTEM_PREAMBLE: &str = "You are a warm, attentive conversational companion. \
Use what you know about the user to tailor your reply, but never recite the profile back to them.";

/// Everything needed to generate the assistant's reply.
#[derive(Debug, Clone)]
pub struct PreparedTurn {
    pub user_message: Message,
    pub decision: GuidedModeDecision,
    pub question: Option<&'static Question>,
    pub context: AssembledContext,
    pub prompt: String,
}

/// The persisted reply plus the handle of the extraction it started.
#[derive(Debug)]
pub struct CompletedTurn {
    pub reply: Message,
    pub extraction: JoinHandle<()>,
}

pub struct ConversationService {
    conversations: Arc<dyn ConversationRepository>,
    guided: Arc<GuidedModeController>,
    assembler: Arc<ContextAssembler>,
    extraction: Arc<ExtractionService>,
    generator: Arc<dyn Generator>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
    questions: QuestionBank,
    history_messages: usize,
}

impl ConversationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        guided: Arc<GuidedModeController>,
        assembler: Arc<ContextAssembler>,
        extraction: Arc<ExtractionService>,
        generator: Arc<dyn Generator>,
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
        history_messages: usize,
    ) -> Self {
        Self {
            conversations,
            guided,
            assembler,
            extraction,
            generator,
            embedder,
            index,
            questions: QuestionBank::default(),
            history_messages,
        }
    }

    pub async fn create(&self, title: Option<String>) -> DomainResult<Conversation> {
        let conversation = Conversation::new(title);
        self.conversations.create(&conversation).await?;
        tracing::info!(conversation_id = %conversation.id, "Conversation created");
        Ok(conversation)
    }

    pub async fn list(&self) -> DomainResult<Vec<Conversation>> {
        self.conversations.list().await
    }

    /// Delete a conversation, its messages and its guided-mode state.
    pub async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.conversations.delete(id).await?;
        self.guided.clear(id).await;
        tracing::info!(conversation_id = %id, "Conversation deleted");
        Ok(())
    }

    pub async fn prepare_turn(&self, conversation_id: Uuid, text: &str) -> DomainResult<PreparedTurn> {
        if text.trim().is_empty() {
            return Err(DomainError::ValidationFailed("message cannot be empty".to_string()));
        }
        if self.conversations.get(conversation_id).await?.is_none() {
            return Err(DomainError::ConversationNotFound(conversation_id));
        }

        let recent = self
            .conversations
            .recent_messages(conversation_id, self.history_messages)
            .await?;
        let user_message = Message::user(conversation_id, text);
        self.conversations.append_message(&user_message).await?;

        let decision = self.guided.process_user_message(conversation_id, text).await?;
        let question = match decision.suggested_axis {
            Some(axis) => {
                let rotation = self
                    .guided
                    .state(conversation_id)
                    .await
                    .map_or(0, |state| state.turn_count as usize);
                self.questions.select(axis, rotation)
            }
            None => None,
        };

        let context = self.assembler.assemble(text, &recent, conversation_id).await?;
        let prompt = build_prompt(&context, question, text);

        Ok(PreparedTurn {
            user_message,
            decision,
            question,
            context,
            prompt,
        })
    }

    pub async fn complete_turn(&self, user_message: &Message, reply_text: &str) -> DomainResult<CompletedTurn> {
        let reply = Message::assistant(user_message.conversation_id, reply_text);
        self.conversations.append_message(&reply).await?;

        let extraction = self.extraction.spawn(user_message.clone());
        for message in [user_message, &reply] {
            self.index_message(message).await;
        }

        Ok(CompletedTurn { reply, extraction })
    }

    /// Prepare, generate and complete a turn in one call.
    pub async fn run_turn(&self, conversation_id: Uuid, text: &str) -> DomainResult<(PreparedTurn, CompletedTurn)> {
        let prepared = self.prepare_turn(conversation_id, text).await?;
        let reply_text = self.generator.generate(&prepared.prompt).await?;
        let completed = self.complete_turn(&prepared.user_message, &reply_text).await?;
        Ok((prepared, completed))
    }

    async fn index_message(&self, message: &Message) {
        if !self.embedder.is_ready() {
            return;
        }
        let result = async {
            let vector = self.embedder.embed(&message.content, EmbeddingMode::Document).await?;
            self.index.index(message.id, &vector).await
        }
        .await;
        if let Err(e) = result {
            tracing::warn!(message_id = %message.id, error = %e, "Failed to index message");
        }
    }
}

fn build_prompt(context: &AssembledContext, question: Option<&Question>, text: &str) -> String {
    let mut prompt = String::from(SYSTEM_PREAMBLE);
    prompt.push_str("\n\n");

    let context_text = context.format_for_prompt();
    if !context_text.is_empty() {
        prompt.push_str(&context_text);
        prompt.push('\n');
    }

    if let Some(question) = question {
        let _ = writeln!(
            prompt,
            "## Guided question\nAfter responding, ask one gentle question about {}. For example: \"{}\"\n",
            question.axis.label(),
            question.text
        );
    }

    let _ = write!(prompt, "## User\n{text}");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteConversationRepository, SqliteEvidenceRepository,
        SqliteProfileRepository, SqliteSignalRepository,
    };
    use crate::domain::models::{ContextConfig, ExtractionBatch, GuidedModeConfig, SimilarPassage};
    use crate::domain::ports::{NullEmbeddingProvider, ObservationExtractor};
    use crate::services::completeness_engine::CompletenessEngine;
    use crate::services::guided_mode::GuidedModeStore;
    use crate::services::profile_store::ProfileStore;
    use crate::services::signal_store::SignalStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, _prompt: &str) -> DomainResult<String> {
            Ok("That sounds like a lot to carry.".to_string())
        }
    }

    struct EmptyExtractor;

    #[async_trait]
    impl ObservationExtractor for EmptyExtractor {
        async fn extract(&self, _: &Message) -> DomainResult<ExtractionBatch> {
            Ok(ExtractionBatch::default())
        }
    }

    struct ReadyEmbedder;

    #[async_trait]
    impl EmbeddingProvider for ReadyEmbedder {
        fn name(&self) -> &'static str {
            "ready"
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

    #[derive(Default)]
    struct RecordingIndex(Mutex<Vec<Uuid>>);

    #[async_trait]
    impl SimilarityIndex for RecordingIndex {
        async fn index(&self, message_id: Uuid, _: &[f32]) -> DomainResult<()> {
            self.0.lock().unwrap().push(message_id);
            Ok(())
        }
        async fn search(&self, _: &[f32], _: usize) -> DomainResult<Vec<SimilarPassage>> {
            Ok(Vec::new())
        }
    }

    async fn service(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn SimilarityIndex>) -> ConversationService {
        let pool = create_migrated_test_pool().await.unwrap();
        let signal_repo = Arc::new(SqliteSignalRepository::new(pool.clone()));
        let profile_repo = Arc::new(SqliteProfileRepository::new(pool.clone()));
        let signals = Arc::new(SignalStore::new(
            signal_repo.clone(),
            Arc::new(SqliteEvidenceRepository::new(pool.clone())),
            profile_repo.clone(),
        ));
        let profile = Arc::new(ProfileStore::new(profile_repo.clone(), signals.write_lock()));
        let guided = Arc::new(GuidedModeController::new(
            CompletenessEngine::new(signal_repo, profile_repo),
            Arc::new(GuidedModeStore::new()),
            &GuidedModeConfig::default(),
        ));
        let assembler = Arc::new(ContextAssembler::new(
            signals.clone(),
            profile.clone(),
            embedder.clone(),
            index.clone(),
            ContextConfig::default(),
        ));
        let extraction = Arc::new(ExtractionService::new(Arc::new(EmptyExtractor), signals, profile));
        ConversationService::new(
            Arc::new(SqliteConversationRepository::new(pool)),
            guided,
            assembler,
            extraction,
            Arc::new(EchoGenerator),
            embedder,
            index,
            10,
        )
    }

    #[tokio::test]
    async fn test_first_turn_is_guided_towards_an_essential_axis() {
        let service = service(Arc::new(NullEmbeddingProvider::new()), Arc::new(RecordingIndex::default())).await;
        let conversation = service.create(None).await.unwrap();

        let prepared = service.prepare_turn(conversation.id, "hey").await.unwrap();
        assert!(prepared.decision.is_guided_mode);
        let question = prepared.question.unwrap();
        assert_eq!(Some(question.axis), prepared.decision.suggested_axis);
        assert!(prepared.prompt.contains(question.text));
        assert!(prepared.prompt.ends_with("## User\nhey"));
    }

    #[tokio::test]
    async fn test_unknown_conversation_is_rejected() {
        let service = service(Arc::new(NullEmbeddingProvider::new()), Arc::new(RecordingIndex::default())).await;
        let err = service.prepare_turn(Uuid::new_v4(), "hello").await.unwrap_err();
        assert!(matches!(err, DomainError::ConversationNotFound(_)));
    }

    #[tokio::test]
    async fn test_run_turn_persists_and_indexes_both_messages() {
        let index = Arc::new(RecordingIndex::default());
        let service = service(Arc::new(ReadyEmbedder), index.clone()).await;
        let conversation = service.create(Some("evening".to_string())).await.unwrap();

        let (prepared, completed) = service.run_turn(conversation.id, "I need advice about my job").await.unwrap();
        completed.extraction.await.unwrap();

        assert!(!prepared.decision.is_guided_mode);
        assert_eq!(completed.reply.content, "That sounds like a lot to carry.");
        let indexed = index.0.lock().unwrap().clone();
        assert_eq!(indexed, vec![prepared.user_message.id, completed.reply.id]);

        let second = service.prepare_turn(conversation.id, "thanks").await.unwrap();
        assert!(second.context.recent_history_text.contains("User: I need advice about my job"));
    }

    #[tokio::test]
    async fn test_delete_clears_guided_state() {
        let service = service(Arc::new(NullEmbeddingProvider::new()), Arc::new(RecordingIndex::default())).await;
        let conversation = service.create(None).await.unwrap();
        service.prepare_turn(conversation.id, "hi there").await.unwrap();
        assert!(service.guided.state(conversation.id).await.is_some());

        service.delete(conversation.id).await.unwrap();
        assert!(service.guided.state(conversation.id).await.is_none());
        assert!(service.list().await.unwrap().is_empty());
    }
}
