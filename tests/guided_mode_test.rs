//! Integration tests for the guided-mode state machine.

mod common;

use rapport::domain::models::{
    Axis, DeactivationReason, GoalStatus, IntentType, MaslowLevel, MaslowObservationType,
};
use uuid::Uuid;

async fn reach_baseline(h: &common::TestHarness, conversation_id: Uuid) {
    h.profile
        .record_maslow(MaslowLevel::Safety, MaslowObservationType::Concern, "rent is tight", common::grounding("rent is tight"))
        .await
        .unwrap();
    h.observe("support_seeking_style", "wants practical advice").await;
    h.observe("life_situation.work_status", "employed").await;
    h.observe("life_situation.living", "shares a flat").await;
    h.profile
        .record_intent(conversation_id, IntentType::AdviceSeeking, "deciding on a job offer", common::grounding("should I take it"))
        .await
        .unwrap();
    h.profile
        .record_challenge("money worries", common::grounding("money is always on my mind"))
        .await
        .unwrap();
    h.profile
        .record_goal("save a deposit", Some(GoalStatus::Active), common::grounding("I want to save for a flat"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fresh_conversation_suggests_highest_weighted_axis() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let conversation_id = Uuid::new_v4();

    let decision = guided.process_user_message(conversation_id, "hi").await.unwrap();
    assert!(decision.is_guided_mode);
    assert_eq!(decision.suggested_axis, Some(Axis::MaslowStatus));

    let state = guided.state(conversation_id).await.unwrap();
    assert_eq!(state.turn_count, 1);
    assert_eq!(state.last_question_axis, Some(Axis::MaslowStatus));
}

#[tokio::test]
async fn test_turn_limit_deactivates_on_the_seventh_turn() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let conversation_id = Uuid::new_v4();

    for turn in 1..=6 {
        let decision = guided.process_user_message(conversation_id, "ok").await.unwrap();
        assert!(decision.is_guided_mode, "turn {turn} should still be guided");
    }

    let seventh = guided.process_user_message(conversation_id, "ok").await.unwrap();
    assert!(!seventh.is_guided_mode);
    assert_eq!(seventh.suggested_axis, None);

    let state = guided.state(conversation_id).await.unwrap();
    assert!(!state.is_active);
    assert_eq!(state.turn_count, 7);
    assert_eq!(state.deactivation_reason, Some(DeactivationReason::MaxTurns));

    // Once inactive, nothing changes.
    guided.process_user_message(conversation_id, "ok").await.unwrap();
    assert_eq!(guided.state(conversation_id).await.unwrap().turn_count, 7);
}

#[tokio::test]
async fn test_diversion_deactivates_without_counting_the_turn() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let conversation_id = Uuid::new_v4();

    guided.process_user_message(conversation_id, "hello").await.unwrap();
    let decision = guided.process_user_message(conversation_id, "i need advice").await.unwrap();
    assert!(!decision.is_guided_mode);

    let state = guided.state(conversation_id).await.unwrap();
    assert_eq!(state.turn_count, 1);
    assert_eq!(state.deactivation_reason, Some(DeactivationReason::UserDiverted));
}

#[tokio::test]
async fn test_long_message_counts_as_diversion() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let conversation_id = Uuid::new_v4();

    let long = "So today started badly and then my manager called me into a meeting about the restructuring plans for next year.";
    let decision = guided.process_user_message(conversation_id, long).await.unwrap();
    assert!(!decision.is_guided_mode);
    assert_eq!(
        guided.state(conversation_id).await.unwrap().deactivation_reason,
        Some(DeactivationReason::UserDiverted)
    );
}

#[tokio::test]
async fn test_baseline_met_stands_guided_mode_down() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let conversation_id = Uuid::new_v4();

    assert!(!guided.baseline_met().await.unwrap());
    reach_baseline(&h, conversation_id).await;
    assert!(guided.baseline_met().await.unwrap());

    let decision = guided.process_user_message(conversation_id, "yes").await.unwrap();
    assert!(!decision.is_guided_mode);
    let state = guided.state(conversation_id).await.unwrap();
    assert_eq!(state.deactivation_reason, Some(DeactivationReason::BaselineMet));
    assert_eq!(state.turn_count, 1);
}

#[tokio::test]
async fn test_clear_restarts_the_conversation() {
    let h = common::harness().await;
    let guided = h.guided(2);
    let conversation_id = Uuid::new_v4();

    guided.process_user_message(conversation_id, "a").await.unwrap();
    guided.process_user_message(conversation_id, "b").await.unwrap();
    assert!(!guided.state(conversation_id).await.unwrap().is_active);

    assert!(guided.clear(conversation_id).await);
    assert!(guided.state(conversation_id).await.is_none());

    let decision = guided.process_user_message(conversation_id, "c").await.unwrap();
    assert!(decision.is_guided_mode);
    assert_eq!(guided.state(conversation_id).await.unwrap().turn_count, 1);
}

#[tokio::test]
async fn test_conversations_are_independent() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    guided.process_user_message(first, "i need advice").await.unwrap();
    let decision = guided.process_user_message(second, "hi").await.unwrap();
    assert!(decision.is_guided_mode);
    assert_eq!(guided.store().len().await, 2);
}

#[tokio::test]
async fn test_failed_store_read_does_not_count_the_turn() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let conversation_id = Uuid::new_v4();

    guided.process_user_message(conversation_id, "hi").await.unwrap();
    h.pool.close().await;

    let result = guided.process_user_message(conversation_id, "ok").await;
    assert!(result.is_err());

    let state = guided.state(conversation_id).await.unwrap();
    assert!(state.is_active);
    assert_eq!(state.turn_count, 1);
    assert_eq!(state.last_question_axis, Some(Axis::MaslowStatus));
}

#[tokio::test]
async fn test_busy_conversation_does_not_block_another() {
    let h = common::harness().await;
    let guided = h.guided(7);
    let busy = Uuid::new_v4();
    let other = Uuid::new_v4();

    let cell = guided.store().entry(busy).await;
    let _held = cell.lock().await;

    let decision = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        guided.process_user_message(other, "hi"),
    )
    .await
    .expect("other conversation should not wait on the busy one")
    .unwrap();
    assert!(decision.is_guided_mode);
}
