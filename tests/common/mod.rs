//! Common test utilities for integration tests
//!
//! Provides a fully wired profile engine over an in-memory database.

#![allow(dead_code)]

use std::sync::Arc;
use uuid::Uuid;

use rapport::adapters::sqlite::{
    create_migrated_test_pool, SqliteEvidenceRepository, SqliteProfileRepository, SqliteSignalRepository,
};
use rapport::domain::models::{GuidedModeConfig, Grounding, Signal, SignalObservation};
use rapport::services::{CompletenessEngine, GuidedModeController, GuidedModeStore, ProfileStore, SignalStore};
use sqlx::SqlitePool;

pub struct TestHarness {
    pub pool: SqlitePool,
    pub signals: Arc<SignalStore>,
    pub profile: Arc<ProfileStore>,
    pub signal_repo: Arc<SqliteSignalRepository>,
    pub profile_repo: Arc<SqliteProfileRepository>,
}

impl TestHarness {
    pub fn engine(&self) -> CompletenessEngine {
        CompletenessEngine::new(self.signal_repo.clone(), self.profile_repo.clone())
    }

    pub fn guided(&self, max_turns: u32) -> GuidedModeController {
        GuidedModeController::new(
            self.engine(),
            Arc::new(GuidedModeStore::new()),
            &GuidedModeConfig { max_turns },
        )
    }

    /// Record a grounded observation and return the stored signal.
    pub async fn observe(&self, dimension: &str, value: &str) -> Signal {
        let observation = SignalObservation::new(dimension, value).grounded(format!("quote about {value}"), Uuid::new_v4());
        self.signals
            .upsert(observation)
            .await
            .expect("upsert should succeed")
            .signal()
            .cloned()
            .expect("grounded observation should be applied")
    }
}

pub async fn harness() -> TestHarness {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let signal_repo = Arc::new(SqliteSignalRepository::new(pool.clone()));
    let profile_repo = Arc::new(SqliteProfileRepository::new(pool.clone()));
    let signals = Arc::new(SignalStore::new(
        signal_repo.clone(),
        Arc::new(SqliteEvidenceRepository::new(pool.clone())),
        profile_repo.clone(),
    ));
    let profile = Arc::new(ProfileStore::new(profile_repo.clone(), signals.write_lock()));

    TestHarness {
        pool,
        signals,
        profile,
        signal_repo,
        profile_repo,
    }
}

pub fn grounding(quote: &str) -> Option<Grounding> {
    Some(Grounding::new(quote, Uuid::new_v4()))
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
