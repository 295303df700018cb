//! Wires adapters and services together for one CLI invocation.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::embeddings::{OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
use crate::adapters::sqlite::{
    initialize_database, PoolConfig, SqliteConversationRepository, SqliteEvidenceRepository,
    SqliteMessageIndex, SqliteProfileRepository, SqliteSignalRepository,
};
use crate::domain::models::Config;
use crate::domain::ports::{ConversationRepository, EmbeddingProvider, NullEmbeddingProvider};
use crate::services::{
    CompletenessEngine, ContextAssembler, GuidedModeController, GuidedModeStore, ProfileStore,
    SignalStore,
};

pub struct App {
    pub config: Config,
    pub signals: Arc<SignalStore>,
    pub profile: Arc<ProfileStore>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub guided: GuidedModeController,
    pub assembler: ContextAssembler,
}

impl App {
    /// Open the configured database and build the service graph.
    pub async fn open(config: Config) -> Result<Self> {
        let pool = initialize_database(
            &config.database.url(),
            Some(PoolConfig::default().with_max_connections(config.database.max_connections)),
        )
        .await
        .context("Failed to initialize database. Run 'rapport init' first.")?;

        let signal_repo = Arc::new(SqliteSignalRepository::new(pool.clone()));
        let profile_repo = Arc::new(SqliteProfileRepository::new(pool.clone()));
        let signals = Arc::new(SignalStore::new(
            signal_repo.clone(),
            Arc::new(SqliteEvidenceRepository::new(pool.clone())),
            profile_repo.clone(),
        ));
        let profile = Arc::new(ProfileStore::new(profile_repo.clone(), signals.write_lock()));

        let guided = GuidedModeController::new(
            CompletenessEngine::new(signal_repo, profile_repo),
            Arc::new(GuidedModeStore::new()),
            &config.guided_mode,
        );
        let assembler = ContextAssembler::new(
            signals.clone(),
            profile.clone(),
            embedder(&config)?,
            Arc::new(SqliteMessageIndex::new(pool.clone())),
            config.context.clone(),
        );

        Ok(Self {
            signals,
            profile,
            conversations: Arc::new(SqliteConversationRepository::new(pool)),
            guided,
            assembler,
            config,
        })
    }
}

fn embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    if config.embeddings.provider == "openai" {
        let provider = OpenAiEmbeddingProvider::new(OpenAiEmbeddingConfig::from(&config.embeddings))
            .context("Failed to build embedding provider")?;
        Ok(Arc::new(provider))
    } else {
        Ok(Arc::new(NullEmbeddingProvider::new()))
    }
}
