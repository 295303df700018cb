//! Evidence domain model.
//!
//! Evidence rows are immutable and append-only. Each links one verbatim quote
//! from one source message to one profile target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signal::Grounding;

/// Kind of profile record an evidence row points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceTarget {
    Signal,
    Value,
    Challenge,
    Goal,
    Maslow,
    Intent,
}

impl EvidenceTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signal => "signal",
            Self::Value => "value",
            Self::Challenge => "challenge",
            Self::Goal => "goal",
            Self::Maslow => "maslow",
            Self::Intent => "intent",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "signal" => Some(Self::Signal),
            "value" => Some(Self::Value),
            "challenge" => Some(Self::Challenge),
            "goal" => Some(Self::Goal),
            "maslow" => Some(Self::Maslow),
            "intent" => Some(Self::Intent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: Uuid,
    pub target_type: EvidenceTarget,
    /// Target record id. Older signal evidence may carry the dimension key here instead.
    pub target_id: String,
    pub source_message_id: Uuid,
    pub quote: String,
    pub created_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(target_type: EvidenceTarget, target_id: impl Into<String>, grounding: &Grounding) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_type,
            target_id: target_id.into(),
            source_message_id: grounding.source_message_id,
            quote: grounding.quote.clone(),
            created_at: Utc::now(),
        }
    }
}
