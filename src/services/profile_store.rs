//! Lifecycle of values, challenges, goals, Maslow and intent observations.
//!
//! Writes follow the same gate as signals: without a grounding the call is a
//! logged no-op returning `None`.

use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Challenge, ChallengeStatus, Evidence, EvidenceTarget, Goal, GoalStatus, Grounding,
    IntentObservation, IntentType, MaslowLevel, MaslowObservation, MaslowObservationType, Value,
    ValueType,
};
use crate::domain::ports::ProfileRepository;

fn require_text(field: &str, text: &str) -> DomainResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::ValidationFailed(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// Only a grounding with a non-blank quote passes the gate.
fn accept_grounding(kind: &str, grounding: Option<Grounding>) -> Option<Grounding> {
    let accepted = grounding.and_then(Grounding::validated);
    if accepted.is_none() {
        tracing::warn!(kind, "Dropping ungrounded observation");
    }
    accepted
}

pub struct ProfileStore {
    repo: Arc<dyn ProfileRepository>,
    write_lock: Arc<Mutex<()>>,
}

impl ProfileStore {
    /// `write_lock` should be the signal store's lock so all profile writes share one writer.
    pub fn new(repo: Arc<dyn ProfileRepository>, write_lock: Arc<Mutex<()>>) -> Self {
        Self { repo, write_lock }
    }

    pub async fn record_value(
        &self,
        name: &str,
        value_type: ValueType,
        grounding: Option<Grounding>,
    ) -> DomainResult<Option<Value>> {
        let Some(grounding) = accept_grounding("value", grounding) else {
            return Ok(None);
        };
        let name = require_text("value name", name)?;

        let _guard = self.write_lock.lock().await;
        let value = match self.repo.find_value(&name).await? {
            // The first observed type is kept.
            Some(mut existing) => {
                existing.mention();
                existing
            }
            None => Value::new(name, value_type),
        };

        let evidence = Evidence::new(EvidenceTarget::Value, value.id.to_string(), &grounding);
        self.repo.save_value(&value, &evidence).await?;
        tracing::debug!(value_id = %value.id, mentions = value.mention_count, "Value recorded");
        Ok(Some(value))
    }

    pub async fn record_challenge(
        &self,
        description: &str,
        grounding: Option<Grounding>,
    ) -> DomainResult<Option<Challenge>> {
        let Some(grounding) = accept_grounding("challenge", grounding) else {
            return Ok(None);
        };
        let description = require_text("challenge description", description)?;

        let _guard = self.write_lock.lock().await;
        let challenge = match self.repo.find_challenge(&description).await? {
            Some(mut existing) => {
                existing.mention();
                existing
            }
            None => Challenge::new(description),
        };

        let evidence = Evidence::new(EvidenceTarget::Challenge, challenge.id.to_string(), &grounding);
        self.repo.save_challenge(&challenge, Some(&evidence)).await?;
        tracing::debug!(challenge_id = %challenge.id, mentions = challenge.mention_count, "Challenge recorded");
        Ok(Some(challenge))
    }

    pub async fn set_challenge_status(&self, id: Uuid, status: ChallengeStatus) -> DomainResult<Challenge> {
        let _guard = self.write_lock.lock().await;
        let mut challenge = self
            .repo
            .get_challenge(id)
            .await?
            .ok_or(DomainError::ChallengeNotFound(id))?;
        challenge.status = status;
        self.repo.save_challenge(&challenge, None).await?;
        tracing::info!(challenge_id = %id, status = status.as_str(), "Challenge status changed");
        Ok(challenge)
    }

    pub async fn record_goal(
        &self,
        description: &str,
        status: Option<GoalStatus>,
        grounding: Option<Grounding>,
    ) -> DomainResult<Option<Goal>> {
        let Some(grounding) = accept_grounding("goal", grounding) else {
            return Ok(None);
        };
        let description = require_text("goal description", description)?;

        let _guard = self.write_lock.lock().await;
        let goal = match self.repo.find_goal(&description).await? {
            Some(mut existing) => {
                existing.mention(status);
                existing
            }
            None => Goal::new(description, status.unwrap_or_default()),
        };

        let evidence = Evidence::new(EvidenceTarget::Goal, goal.id.to_string(), &grounding);
        self.repo.save_goal(&goal, Some(&evidence)).await?;
        tracing::debug!(goal_id = %goal.id, status = goal.status.as_str(), "Goal recorded");
        Ok(Some(goal))
    }

    pub async fn set_goal_status(&self, id: Uuid, status: GoalStatus) -> DomainResult<Goal> {
        let _guard = self.write_lock.lock().await;
        let mut goal = self.repo.get_goal(id).await?.ok_or(DomainError::GoalNotFound(id))?;
        goal.status = status;
        self.repo.save_goal(&goal, None).await?;
        tracing::info!(goal_id = %id, status = status.as_str(), "Goal status changed");
        Ok(goal)
    }

    pub async fn record_maslow(
        &self,
        level: MaslowLevel,
        observation_type: MaslowObservationType,
        description: &str,
        grounding: Option<Grounding>,
    ) -> DomainResult<Option<MaslowObservation>> {
        let Some(grounding) = accept_grounding("maslow", grounding) else {
            return Ok(None);
        };

        let observation = MaslowObservation::new(level, observation_type, description.trim());
        let evidence = Evidence::new(EvidenceTarget::Maslow, observation.id.to_string(), &grounding);

        let _guard = self.write_lock.lock().await;
        self.repo.add_maslow(&observation, &evidence).await?;
        tracing::debug!(level = level.as_str(), kind = observation_type.as_str(), "Maslow observation recorded");
        Ok(Some(observation))
    }

    pub async fn record_intent(
        &self,
        conversation_id: Uuid,
        intent_type: IntentType,
        description: &str,
        grounding: Option<Grounding>,
    ) -> DomainResult<Option<IntentObservation>> {
        let Some(grounding) = accept_grounding("intent", grounding) else {
            return Ok(None);
        };

        let intent = IntentObservation::new(conversation_id, intent_type, description.trim());
        let evidence = Evidence::new(EvidenceTarget::Intent, intent.id.to_string(), &grounding);

        let _guard = self.write_lock.lock().await;
        self.repo.add_intent(&intent, &evidence).await?;
        tracing::debug!(conversation_id = %conversation_id, intent = intent_type.as_str(), "Intent recorded");
        Ok(Some(intent))
    }

    /// Values, highest confidence first.
    pub async fn top_values(&self, limit: usize) -> DomainResult<Vec<Value>> {
        let mut values = self.repo.list_values().await?;
        values.truncate(limit);
        Ok(values)
    }

    /// Active challenges, most mentioned first.
    pub async fn active_challenges(&self, limit: usize) -> DomainResult<Vec<Challenge>> {
        let mut challenges = self.repo.list_challenges(Some(ChallengeStatus::Active)).await?;
        challenges.truncate(limit);
        Ok(challenges)
    }

    /// Active and in-progress goals, most recently seen first.
    pub async fn open_goals(&self, limit: usize) -> DomainResult<Vec<Goal>> {
        let goals = self.repo.list_goals().await?;
        Ok(goals.into_iter().filter(|g| g.status.is_open()).take(limit).collect())
    }

    pub async fn recent_maslow(&self, limit: usize) -> DomainResult<Vec<MaslowObservation>> {
        self.repo.list_maslow(Some(limit)).await
    }

    /// The latest intent recorded for a conversation.
    pub async fn current_intent(&self, conversation_id: Uuid) -> DomainResult<Option<IntentObservation>> {
        self.repo.latest_intent(conversation_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteProfileRepository};

    async fn setup_store() -> ProfileStore {
        let pool = create_migrated_test_pool().await.unwrap();
        ProfileStore::new(
            Arc::new(SqliteProfileRepository::new(pool)),
            Arc::new(Mutex::new(())),
        )
    }

    fn grounded(quote: &str) -> Option<Grounding> {
        Some(Grounding::new(quote, Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_value_dedupes_and_raises_confidence() {
        let store = setup_store().await;
        let first = store
            .record_value("Honesty", ValueType::Stated, grounded("honesty matters to me"))
            .await
            .unwrap()
            .unwrap();
        let second = store
            .record_value("honesty", ValueType::Revealed, grounded("I told them the truth"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.mention_count, 2);
        assert!((second.confidence - 0.7).abs() < 1e-9);
        assert_eq!(second.value_type, ValueType::Stated);
        assert_eq!(store.top_values(5).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ungrounded_writes_are_noops() {
        let store = setup_store().await;
        assert!(store.record_value("family", ValueType::Stated, None).await.unwrap().is_none());
        assert!(store.record_challenge("money", None).await.unwrap().is_none());
        assert!(store.record_goal("travel", None, None).await.unwrap().is_none());
        assert!(store
            .record_maslow(MaslowLevel::Safety, MaslowObservationType::Concern, "rent", None)
            .await
            .unwrap()
            .is_none());
        assert!(store.top_values(5).await.unwrap().is_empty());
        assert!(store.recent_maslow(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_quotes_do_not_pass_the_gate() {
        let store = setup_store().await;
        let conversation_id = Uuid::new_v4();

        assert!(store.record_value("family", ValueType::Stated, grounded("   ")).await.unwrap().is_none());
        assert!(store.record_challenge("money", grounded("\t")).await.unwrap().is_none());
        assert!(store.record_goal("travel", None, grounded("")).await.unwrap().is_none());
        assert!(store
            .record_maslow(MaslowLevel::Safety, MaslowObservationType::Concern, "rent", grounded("  "))
            .await
            .unwrap()
            .is_none());
        assert!(store
            .record_intent(conversation_id, IntentType::Venting, "long week", grounded(" \n "))
            .await
            .unwrap()
            .is_none());

        assert!(store.top_values(5).await.unwrap().is_empty());
        assert!(store.active_challenges(5).await.unwrap().is_empty());
        assert!(store.open_goals(5).await.unwrap().is_empty());
        assert!(store.recent_maslow(5).await.unwrap().is_empty());
        assert!(store.current_intent(conversation_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolved_challenge_reactivates() {
        let store = setup_store().await;
        let challenge = store
            .record_challenge("Conflict with my manager", grounded("my manager and I keep clashing"))
            .await
            .unwrap()
            .unwrap();
        store.set_challenge_status(challenge.id, ChallengeStatus::Resolved).await.unwrap();
        assert!(store.active_challenges(3).await.unwrap().is_empty());

        let again = store
            .record_challenge("conflict with my  manager", grounded("it's happening again"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.id, challenge.id);
        assert!(again.is_active());
        assert!(again.is_recurring());
    }

    #[tokio::test]
    async fn test_goal_status_updates() {
        let store = setup_store().await;
        let goal = store
            .record_goal("Run a half marathon", None, grounded("I want to run a half marathon"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(goal.status, GoalStatus::Active);

        let updated = store
            .record_goal("run a half marathon", Some(GoalStatus::InProgress), grounded("training started"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, GoalStatus::InProgress);

        store.set_goal_status(goal.id, GoalStatus::Achieved).await.unwrap();
        assert!(store.open_goals(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = setup_store().await;
        let err = store.set_goal_status(Uuid::new_v4(), GoalStatus::Abandoned).await.unwrap_err();
        assert!(matches!(err, DomainError::GoalNotFound(_)));
        let err = store.set_challenge_status(Uuid::new_v4(), ChallengeStatus::Dormant).await.unwrap_err();
        assert!(matches!(err, DomainError::ChallengeNotFound(_)));
    }

    #[tokio::test]
    async fn test_current_intent_is_latest_for_conversation() {
        let store = setup_store().await;
        let conversation_id = Uuid::new_v4();
        store
            .record_intent(conversation_id, IntentType::Venting, "", grounded("I just need to vent"))
            .await
            .unwrap();
        store
            .record_intent(conversation_id, IntentType::DecisionSupport, "job offer", grounded("should I take it"))
            .await
            .unwrap();

        let current = store.current_intent(conversation_id).await.unwrap().unwrap();
        assert_eq!(current.intent_type, IntentType::DecisionSupport);
    }

    #[tokio::test]
    async fn test_blank_names_are_rejected() {
        let store = setup_store().await;
        let err = store.record_value("   ", ValueType::Stated, grounded("q")).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }
}
