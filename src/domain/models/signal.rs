//! Signal domain model.
//!
//! A signal is the stored (value, confidence, evidence-count) triple for one
//! hierarchical dimension key such as `moral.care` or `risk_tolerance`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard ceiling on signal confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Confidence a new signal starts from before its first increment is applied.
pub const BASE_CONFIDENCE: f64 = 0.5;
/// Default per-observation confidence increment.
pub const DEFAULT_INCREMENT: f64 = 0.1;
/// Confidence at which a single-signal axis counts as a clear pattern.
pub const CLEAR_PATTERN_CONFIDENCE: f64 = 0.7;

/// Verbatim quote plus the message it came from.
///
/// Every profile mutation requires one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grounding {
    pub quote: String,
    pub source_message_id: Uuid,
}

impl Grounding {
    pub fn new(quote: impl Into<String>, source_message_id: Uuid) -> Self {
        Self {
            quote: quote.into(),
            source_message_id,
        }
    }

    /// Build a grounding only when both parts are present and the quote is not blank.
    pub fn from_parts(quote: Option<&str>, source_message_id: Option<Uuid>) -> Option<Self> {
        match (quote.map(str::trim), source_message_id) {
            (Some(q), Some(id)) if !q.is_empty() => Some(Self::new(q, id)),
            _ => None,
        }
    }

    /// Trim the quote, rejecting a grounding whose quote is blank.
    pub fn validated(self) -> Option<Self> {
        let quote = self.quote.trim();
        if quote.is_empty() {
            return None;
        }
        Some(Self::new(quote, self.source_message_id))
    }
}

/// Stored signal for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub dimension: String,
    pub value: String,
    pub confidence: f64,
    pub evidence_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Signal {
    /// Create a signal from its first grounded observation.
    pub fn first_observation(dimension: impl Into<String>, value: impl Into<String>, increment: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            dimension: dimension.into(),
            value: value.into(),
            confidence: bump_confidence(BASE_CONFIDENCE, increment),
            evidence_count: 1,
            created_at: now,
            last_updated: now,
        }
    }

    /// Fold a further grounded observation into this signal.
    ///
    /// Confidence never decreases and never exceeds [`MAX_CONFIDENCE`].
    pub fn observe(&mut self, value: impl Into<String>, increment: f64) {
        self.confidence = bump_confidence(self.confidence, increment);
        self.evidence_count += 1;
        self.value = value.into();
        self.last_updated = Utc::now();
    }

    pub fn is_clear_pattern(&self) -> bool {
        self.confidence >= CLEAR_PATTERN_CONFIDENCE
    }

    /// Last segment of the dimension key (`moral.care` -> `care`).
    pub fn leaf(&self) -> &str {
        self.dimension
            .rsplit_once('.')
            .map_or(self.dimension.as_str(), |(_, leaf)| leaf)
    }
}

/// Raise a confidence by a non-negative increment, capped at [`MAX_CONFIDENCE`].
pub fn bump_confidence(current: f64, increment: f64) -> f64 {
    let increment = if increment.is_finite() { increment.max(0.0) } else { 0.0 };
    (current + increment).min(MAX_CONFIDENCE).max(current.min(MAX_CONFIDENCE))
}

/// A candidate signal write, typically produced by extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalObservation {
    pub dimension: String,
    pub value: String,
    pub quote: Option<String>,
    pub source_message_id: Option<Uuid>,
    pub increment: f64,
}

impl SignalObservation {
    pub fn new(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            dimension: dimension.into(),
            value: value.into(),
            quote: None,
            source_message_id: None,
            increment: DEFAULT_INCREMENT,
        }
    }

    pub fn grounded(mut self, quote: impl Into<String>, source_message_id: Uuid) -> Self {
        self.quote = Some(quote.into());
        self.source_message_id = Some(source_message_id);
        self
    }

    pub fn with_increment(mut self, increment: f64) -> Self {
        self.increment = increment;
        self
    }

    pub fn grounding(&self) -> Option<Grounding> {
        Grounding::from_parts(self.quote.as_deref(), self.source_message_id)
    }
}

/// Result of an upsert attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(Signal),
    Updated(Signal),
    /// Dropped because no quote/source message was supplied.
    Ungrounded,
}

impl UpsertOutcome {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            Self::Created(s) | Self::Updated(s) => Some(s),
            Self::Ungrounded => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Ungrounded)
    }
}
