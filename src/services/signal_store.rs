//! Evidence-gated signal store.
//!
//! No observation enters the profile without a verbatim quote and the id of
//! the message it came from. Writes are serialized through one lock so the
//! read-modify-write of an upsert never interleaves.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Evidence, EvidenceTarget, Signal, SignalObservation, UpsertOutcome};
use crate::domain::ports::{EvidenceRepository, ProfileRepository, SignalRepository};

/// Rows removed by a full profile reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    pub signals: u64,
    pub entities: u64,
    pub evidence: u64,
}

pub struct SignalStore {
    signals: Arc<dyn SignalRepository>,
    evidence: Arc<dyn EvidenceRepository>,
    profile: Arc<dyn ProfileRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl SignalStore {
    pub fn new(
        signals: Arc<dyn SignalRepository>,
        evidence: Arc<dyn EvidenceRepository>,
        profile: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            signals,
            evidence,
            profile,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The lock every profile writer must hold.
    pub fn write_lock(&self) -> Arc<Mutex<()>> {
        Arc::clone(&self.write_lock)
    }

    /// Fold one observation into the profile.
    ///
    /// Without a quote and source message id the call is a logged no-op that
    /// returns [`UpsertOutcome::Ungrounded`].
    pub async fn upsert(&self, observation: SignalObservation) -> DomainResult<UpsertOutcome> {
        let dimension = observation.dimension.trim().to_lowercase();
        let Some(grounding) = observation.grounding() else {
            tracing::warn!(dimension = %dimension, "Dropping ungrounded signal observation");
            return Ok(UpsertOutcome::Ungrounded);
        };

        if dimension.is_empty() {
            return Err(DomainError::ValidationFailed("signal dimension cannot be empty".to_string()));
        }

        let value = observation.value.trim();
        let _guard = self.write_lock.lock().await;

        let (signal, created) = match self.signals.get_by_dimension(&dimension).await? {
            Some(mut existing) => {
                existing.observe(value, observation.increment);
                (existing, false)
            }
            None => (Signal::first_observation(&dimension, value, observation.increment), true),
        };

        let evidence = Evidence::new(EvidenceTarget::Signal, signal.id.to_string(), &grounding);
        self.signals.save_with_evidence(&signal, &evidence).await?;

        tracing::debug!(
            dimension = %signal.dimension,
            confidence = signal.confidence,
            evidence_count = signal.evidence_count,
            created,
            "Signal updated"
        );

        Ok(if created {
            UpsertOutcome::Created(signal)
        } else {
            UpsertOutcome::Updated(signal)
        })
    }

    pub async fn get(&self, dimension: &str) -> DomainResult<Option<Signal>> {
        self.signals.get_by_dimension(dimension).await
    }

    /// Signals under a key prefix, highest confidence first. `""` lists all.
    pub async fn list(&self, prefix: &str) -> DomainResult<Vec<Signal>> {
        self.signals.list_by_prefix(prefix).await
    }

    /// Evidence for a signal, looked up by signal id or by dimension key.
    ///
    /// Evidence rows keyed either way are returned together, oldest first.
    pub async fn evidence_for(&self, key: &str) -> DomainResult<Vec<Evidence>> {
        let key = key.trim();
        let signal = match Uuid::parse_str(key) {
            Ok(id) => self.signals.get(id).await?,
            Err(_) => self.signals.get_by_dimension(key).await?,
        };

        let targets = match signal {
            Some(signal) => vec![signal.id.to_string(), signal.dimension],
            None => vec![key.to_string()],
        };
        self.evidence.list_for_targets(EvidenceTarget::Signal, &targets).await
    }

    /// Evidence recorded against a profile entity.
    pub async fn evidence_for_target(&self, target: EvidenceTarget, id: Uuid) -> DomainResult<Vec<Evidence>> {
        self.evidence.list_for_targets(target, &[id.to_string()]).await
    }

    /// Delete every signal, profile entity and evidence row.
    pub async fn reset_profile(&self) -> DomainResult<ResetReport> {
        let _guard = self.write_lock.lock().await;
        let report = ResetReport {
            evidence: self.evidence.delete_all().await?,
            signals: self.signals.delete_all().await?,
            entities: self.profile.delete_all().await?,
        };
        tracing::info!(
            signals = report.signals,
            entities = report.entities,
            evidence = report.evidence,
            "Profile reset"
        );
        Ok(report)
    }
}
