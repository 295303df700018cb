//! Structured observations extracted from one user message.
//!
//! Every item carries the verbatim quote it was read from. Items are grounded
//! on the source message when the batch is applied.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSignal {
    pub dimension: String,
    pub value: String,
    pub quote: String,
    #[serde(default)]
    pub increment: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedValue {
    pub name: String,
    /// `stated` or `revealed`.
    pub value_type: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedChallenge {
    pub description: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedGoal {
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedMaslow {
    pub level: String,
    /// `concern`, `stable` or `aspiration`.
    pub observation_type: String,
    pub description: String,
    pub quote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedIntent {
    pub intent_type: String,
    #[serde(default)]
    pub description: String,
    pub quote: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionBatch {
    #[serde(default)]
    pub signals: Vec<ExtractedSignal>,
    #[serde(default)]
    pub values: Vec<ExtractedValue>,
    #[serde(default)]
    pub challenges: Vec<ExtractedChallenge>,
    #[serde(default)]
    pub goals: Vec<ExtractedGoal>,
    #[serde(default)]
    pub maslow: Vec<ExtractedMaslow>,
    #[serde(default)]
    pub intents: Vec<ExtractedIntent>,
}

impl ExtractionBatch {
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
            && self.values.is_empty()
            && self.challenges.is_empty()
            && self.goals.is_empty()
            && self.maslow.is_empty()
            && self.intents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.signals.len()
            + self.values.len()
            + self.challenges.len()
            + self.goals.len()
            + self.maslow.len()
            + self.intents.len()
    }
}

/// Counts from applying one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    pub applied: usize,
    pub ungrounded: usize,
    pub invalid: usize,
}
