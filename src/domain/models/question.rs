//! Candidate elicitation prompts.

use serde::Serialize;

use super::axis::{Axis, AxisTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Open,
    Scaled,
    Scenario,
    Reflective,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Scaled => "scaled",
            Self::Scenario => "scenario",
            Self::Reflective => "reflective",
        }
    }
}

/// One static prompt. The UI decides how to phrase and deliver it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub axis: Axis,
    pub question_type: QuestionType,
    pub text: &'static str,
}

impl Question {
    pub const fn new(id: &'static str, axis: Axis, question_type: QuestionType, text: &'static str) -> Self {
        Self {
            id,
            axis,
            question_type,
            text,
        }
    }

    pub fn tier(&self) -> AxisTier {
        self.axis.tier()
    }
}
