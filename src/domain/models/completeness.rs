//! Completeness and priority models.

use serde::{Serialize, Serializer};
use std::fmt;

use super::axis::Axis;

/// Discrete completeness tier.
///
/// Scores are tiers rather than a continuous value so that controller
/// thresholds compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompletenessScore {
    Unknown,
    Sparse,
    Partial,
    Substantial,
    Complete,
}

impl CompletenessScore {
    pub fn value(&self) -> f64 {
        match self {
            Self::Unknown => 0.0,
            Self::Sparse => 0.25,
            Self::Partial => 0.5,
            Self::Substantial => 0.75,
            Self::Complete => 1.0,
        }
    }
}

impl Serialize for CompletenessScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

impl fmt::Display for CompletenessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

/// Completeness of one axis with a human-readable justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisCompleteness {
    /// Axis name as queried; unrecognized names are echoed back.
    pub axis: String,
    pub score: CompletenessScore,
    pub reason: String,
}

impl AxisCompleteness {
    pub fn new(axis: Axis, score: CompletenessScore, reason: impl Into<String>) -> Self {
        Self {
            axis: axis.as_str().to_string(),
            score,
            reason: reason.into(),
        }
    }

    /// Zero-score sentinel for names outside the known axes.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            axis: name.into(),
            score: CompletenessScore::Unknown,
            reason: "unknown axis".to_string(),
        }
    }

    pub fn value(&self) -> f64 {
        self.score.value()
    }
}

/// Weighted gap for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisPriority {
    pub axis: Axis,
    pub weight: f64,
    pub completeness: f64,
    pub priority: f64,
}

/// One row of an ordered tier table: when `matches` holds, the axis scores `score`.
///
/// Tables are evaluated top-down and the first match wins, so each table
/// lists its highest tier first and ends with an always-true fallback.
pub struct TierRule<F> {
    pub score: CompletenessScore,
    pub matches: fn(&F) -> bool,
    pub reason: fn(&F) -> String,
}

impl<F> TierRule<F> {
    pub const fn new(score: CompletenessScore, matches: fn(&F) -> bool, reason: fn(&F) -> String) -> Self {
        Self { score, matches, reason }
    }
}

/// Evaluate an ordered tier table against the facts gathered for an axis.
pub fn evaluate_tiers<F>(axis: Axis, facts: &F, rules: &[TierRule<F>]) -> AxisCompleteness {
    rules
        .iter()
        .find(|rule| (rule.matches)(facts))
        .map_or_else(
            || AxisCompleteness::new(axis, CompletenessScore::Unknown, "no matching tier"),
            |rule| AxisCompleteness::new(axis, rule.score, (rule.reason)(facts)),
        )
}
