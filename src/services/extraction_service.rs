//! Applies extracted observations to the profile.
//!
//! Every item is grounded on the message it was extracted from. An item whose
//! quote cannot be found in that message is treated as ungrounded and goes
//! through the stores' gate as such.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::profile_store::ProfileStore;
use super::signal_store::SignalStore;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    is_known_dimension, normalize_key, ExtractionBatch, ExtractionReport, GoalStatus, Grounding,
    IntentType, MaslowLevel, MaslowObservationType, Message, MessageRole, SignalObservation,
    ValueType, DEFAULT_INCREMENT,
};
use crate::domain::ports::ObservationExtractor;

/// Ground a quote on a message, if the quote really occurs in it.
///
/// Matching ignores case and runs of whitespace.
pub fn ground_quote(quote: &str, message: &Message) -> Option<Grounding> {
    let needle = normalize_key(quote);
    if needle.is_empty() || !normalize_key(&message.content).contains(&needle) {
        return None;
    }
    Some(Grounding::new(quote.trim(), message.id))
}

fn invalid<T>(what: &str, raw: &str) -> DomainResult<Option<T>> {
    Err(DomainError::ValidationFailed(format!("unrecognized {what}: {raw}")))
}

fn tally<T>(report: &mut ExtractionReport, result: DomainResult<Option<T>>) -> DomainResult<()> {
    match result {
        Ok(Some(_)) => report.applied += 1,
        Ok(None) => report.ungrounded += 1,
        Err(DomainError::ValidationFailed(reason)) => {
            tracing::debug!(reason = %reason, "Skipping invalid extracted item");
            report.invalid += 1;
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

pub struct ExtractionService {
    extractor: Arc<dyn ObservationExtractor>,
    signals: Arc<SignalStore>,
    profile: Arc<ProfileStore>,
}

impl ExtractionService {
    pub fn new(
        extractor: Arc<dyn ObservationExtractor>,
        signals: Arc<SignalStore>,
        profile: Arc<ProfileStore>,
    ) -> Self {
        Self {
            extractor,
            signals,
            profile,
        }
    }

    /// Route every item of `batch` through the evidence-gated stores.
    pub async fn apply(&self, batch: &ExtractionBatch, message: &Message) -> DomainResult<ExtractionReport> {
        let mut report = ExtractionReport::default();

        for item in &batch.signals {
            let result = if is_known_dimension(&item.dimension) {
                let mut observation = SignalObservation::new(&item.dimension, &item.value)
                    .with_increment(item.increment.unwrap_or(DEFAULT_INCREMENT));
                if let Some(grounding) = ground_quote(&item.quote, message) {
                    observation = observation.grounded(grounding.quote, grounding.source_message_id);
                }
                self.signals.upsert(observation).await.map(|outcome| outcome.signal().cloned())
            } else {
                invalid("dimension", &item.dimension)
            };
            tally(&mut report, result)?;
        }

        for item in &batch.values {
            let result = match ValueType::from_str(&item.value_type) {
                Some(value_type) => {
                    self.profile
                        .record_value(&item.name, value_type, ground_quote(&item.quote, message))
                        .await
                }
                None => invalid("value type", &item.value_type),
            };
            tally(&mut report, result)?;
        }

        for item in &batch.challenges {
            let result = self
                .profile
                .record_challenge(&item.description, ground_quote(&item.quote, message))
                .await;
            tally(&mut report, result)?;
        }

        for item in &batch.goals {
            let status = match item.status.as_deref() {
                None => Ok(None),
                Some(raw) => GoalStatus::from_str(raw).map(Some).ok_or(raw),
            };
            let result = match status {
                Ok(status) => {
                    self.profile
                        .record_goal(&item.description, status, ground_quote(&item.quote, message))
                        .await
                }
                Err(raw) => invalid("goal status", raw),
            };
            tally(&mut report, result)?;
        }

        for item in &batch.maslow {
            let parsed = MaslowLevel::from_str(&item.level)
                .zip(MaslowObservationType::from_str(&item.observation_type));
            let result = match parsed {
                Some((level, observation_type)) => {
                    self.profile
                        .record_maslow(level, observation_type, &item.description, ground_quote(&item.quote, message))
                        .await
                }
                None => invalid("maslow level/type", &format!("{}/{}", item.level, item.observation_type)),
            };
            tally(&mut report, result)?;
        }

        for item in &batch.intents {
            let result = match IntentType::from_str(&item.intent_type) {
                Some(intent_type) => {
                    self.profile
                        .record_intent(
                            message.conversation_id,
                            intent_type,
                            &item.description,
                            ground_quote(&item.quote, message),
                        )
                        .await
                }
                None => invalid("intent type", &item.intent_type),
            };
            tally(&mut report, result)?;
        }

        tracing::info!(
            message_id = %message.id,
            applied = report.applied,
            ungrounded = report.ungrounded,
            invalid = report.invalid,
            "Extraction applied"
        );
        Ok(report)
    }

    /// Extract from a user message and apply the result.
    pub async fn run(&self, message: &Message) -> DomainResult<ExtractionReport> {
        if message.role != MessageRole::User {
            return Ok(ExtractionReport::default());
        }
        let batch = self.extractor.extract(message).await?;
        if batch.is_empty() {
            return Ok(ExtractionReport::default());
        }
        self.apply(&batch, message).await
    }

    /// Run extraction on a background task. Failures are logged and dropped.
    pub fn spawn(self: &Arc<Self>, message: Message) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.run(&message).await {
                tracing::warn!(message_id = %message.id, error = %e, "Background extraction failed");
            }
        })
    }
}
