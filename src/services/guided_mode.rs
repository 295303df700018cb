//! Guided-mode controller.
//!
//! While active, guided mode steers each turn toward the highest-priority
//! axis. It stands down for good when the user diverts, when the turn budget
//! runs out, or when the baseline gate is met.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::completeness_engine::CompletenessEngine;
use super::priority_calculator::PriorityCalculator;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Axis, AxisPriority, DeactivationReason, GuidedModeConfig, GuidedModeDecision, GuidedModeState,
};

const SELF_INITIATED_PHRASES: &[&str] = &[
    "help me with",
    "i need advice",
    "i'm worried about",
    "i am worried about",
    "can you help",
    "i want to talk about",
    "let's talk about",
    "i have a question",
    "what should i do",
    "i need help",
    "quick question",
    "something happened",
];

const URGENCY_PHRASES: &[&str] = &[
    "urgent",
    "emergency",
    "crisis",
    "asap",
    "right now",
    "immediately",
    "panic",
    "can't cope",
    "suicid",
    "hurt myself",
];

const QUESTION_MIN_CHARS: usize = 20;
const DIRECT_ANSWER_MAX_CHARS: usize = 50;
const OWN_TOPIC_MIN_CHARS: usize = 100;

/// What made a message count as a diversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiversionCue {
    SelfInitiatedTopic,
    Question,
    Urgency,
    LongMessage,
}

/// Classify a user message against the current line of questioning.
///
/// Checks run in a fixed order and the first hit wins.
pub fn detect_diversion(text: &str, last_question_axis: Option<Axis>) -> Option<DiversionCue> {
    let lowered = text.trim().to_lowercase();
    let length = lowered.chars().count();

    if SELF_INITIATED_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Some(DiversionCue::SelfInitiatedTopic);
    }
    if lowered.contains('?') && length > QUESTION_MIN_CHARS {
        return Some(DiversionCue::Question);
    }
    if URGENCY_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Some(DiversionCue::Urgency);
    }
    if last_question_axis.is_some() && length < DIRECT_ANSWER_MAX_CHARS {
        return None;
    }
    if length > OWN_TOPIC_MIN_CHARS {
        return Some(DiversionCue::LongMessage);
    }
    None
}

pub fn is_diversion(text: &str, last_question_axis: Option<Axis>) -> bool {
    detect_diversion(text, last_question_axis).is_some()
}

/// Per-conversation guided-mode state, held in memory for the process lifetime.
///
/// Each conversation has its own lock, so turns in different conversations
/// never wait on each other.
#[derive(Debug, Default)]
pub struct GuidedModeStore {
    states: Mutex<HashMap<Uuid, Arc<Mutex<GuidedModeState>>>>,
}

impl GuidedModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The state cell for a conversation, created in the active state on first use.
    pub async fn entry(&self, conversation_id: Uuid) -> Arc<Mutex<GuidedModeState>> {
        let mut states = self.states.lock().await;
        Arc::clone(states.entry(conversation_id).or_default())
    }

    pub async fn get(&self, conversation_id: Uuid) -> Option<GuidedModeState> {
        let cell = self.states.lock().await.get(&conversation_id).cloned()?;
        let state = cell.lock().await.clone();
        Some(state)
    }

    /// Forget a conversation. A later message starts it fresh in the active state.
    pub async fn clear(&self, conversation_id: Uuid) -> bool {
        self.states.lock().await.remove(&conversation_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.states.lock().await.len()
    }
}

pub struct GuidedModeController {
    engine: CompletenessEngine,
    calculator: PriorityCalculator,
    store: Arc<GuidedModeStore>,
    max_turns: u32,
}

impl GuidedModeController {
    pub fn new(engine: CompletenessEngine, store: Arc<GuidedModeStore>, config: &GuidedModeConfig) -> Self {
        Self {
            engine,
            calculator: PriorityCalculator::new(),
            store,
            max_turns: config.max_turns,
        }
    }

    pub fn with_calculator(mut self, calculator: PriorityCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn store(&self) -> &Arc<GuidedModeStore> {
        &self.store
    }

    pub fn engine(&self) -> &CompletenessEngine {
        &self.engine
    }

    pub async fn calculate_all_priorities(&self) -> DomainResult<Vec<AxisPriority>> {
        let completeness = self.engine.completeness_map().await?;
        Ok(self.calculator.calculate_all(&completeness))
    }

    pub async fn highest_priority_axis(&self) -> DomainResult<Option<Axis>> {
        let priorities = self.calculate_all_priorities().await?;
        Ok(self.calculator.highest(&priorities).map(|p| p.axis))
    }

    pub async fn baseline_met(&self) -> DomainResult<bool> {
        let completeness = self.engine.completeness_map().await?;
        Ok(self.calculator.baseline_met(&completeness))
    }

    /// Advance the conversation's state machine by one user message.
    ///
    /// The turn is only counted once the completeness reads succeed; a failed
    /// read leaves the state untouched.
    pub async fn process_user_message(&self, conversation_id: Uuid, text: &str) -> DomainResult<GuidedModeDecision> {
        let cell = self.store.entry(conversation_id).await;
        let mut state = cell.lock().await;

        if !state.is_active {
            return Ok(GuidedModeDecision::inactive());
        }

        if let Some(cue) = detect_diversion(text, state.last_question_axis) {
            state.deactivate(DeactivationReason::UserDiverted);
            tracing::info!(conversation_id = %conversation_id, cue = ?cue, "Guided mode stood down: user diverted");
            return Ok(GuidedModeDecision::inactive());
        }

        let turn = state.turn_count + 1;
        if turn >= self.max_turns {
            state.turn_count = turn;
            state.deactivate(DeactivationReason::MaxTurns);
            tracing::info!(conversation_id = %conversation_id, turns = turn, "Guided mode stood down: turn limit");
            return Ok(GuidedModeDecision::inactive());
        }

        let completeness = self.engine.completeness_map().await?;
        state.turn_count = turn;
        if self.calculator.baseline_met(&completeness) {
            state.deactivate(DeactivationReason::BaselineMet);
            tracing::info!(conversation_id = %conversation_id, turns = turn, "Guided mode stood down: baseline met");
            return Ok(GuidedModeDecision::inactive());
        }

        let priorities = self.calculator.calculate_all(&completeness);
        let suggested = self.calculator.highest(&priorities).map(|p| p.axis);
        state.last_question_axis = suggested;
        tracing::debug!(conversation_id = %conversation_id, turn, axis = ?suggested, "Guided mode continues");

        Ok(GuidedModeDecision {
            is_guided_mode: true,
            suggested_axis: suggested,
        })
    }

    pub async fn state(&self, conversation_id: Uuid) -> Option<GuidedModeState> {
        self.store.get(conversation_id).await
    }

    pub async fn clear(&self, conversation_id: Uuid) -> bool {
        self.store.clear(conversation_id).await
    }
}
