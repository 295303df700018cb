//! Guided-mode state for one conversation.

use serde::{Deserialize, Serialize};

use super::axis::Axis;

/// Why guided mode stood down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationReason {
    BaselineMet,
    UserDiverted,
    MaxTurns,
}

impl DeactivationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaselineMet => "baseline_met",
            Self::UserDiverted => "user_diverted",
            Self::MaxTurns => "max_turns",
        }
    }
}

/// Per-conversation steering state. Lives only for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidedModeState {
    pub is_active: bool,
    pub turn_count: u32,
    pub last_question_axis: Option<Axis>,
    pub deactivation_reason: Option<DeactivationReason>,
}

impl Default for GuidedModeState {
    fn default() -> Self {
        Self {
            is_active: true,
            turn_count: 0,
            last_question_axis: None,
            deactivation_reason: None,
        }
    }
}

impl GuidedModeState {
    /// Deactivation is terminal: once inactive, the reason is never overwritten.
    pub fn deactivate(&mut self, reason: DeactivationReason) {
        if self.is_active {
            self.is_active = false;
            self.deactivation_reason = Some(reason);
        }
    }
}

/// Result of feeding one user message through the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuidedModeDecision {
    pub is_guided_mode: bool,
    pub suggested_axis: Option<Axis>,
}

impl GuidedModeDecision {
    pub fn inactive() -> Self {
        Self {
            is_guided_mode: false,
            suggested_axis: None,
        }
    }
}
