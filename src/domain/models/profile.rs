//! Profile entities: values, challenges, goals, Maslow observations and intents.
//!
//! These have their own light lifecycle and feed several completeness rules
//! directly. Like signals, they only change through grounded observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::signal::{bump_confidence, BASE_CONFIDENCE, CLEAR_PATTERN_CONFIDENCE, DEFAULT_INCREMENT};

/// Lowercase and collapse whitespace so repeated mentions dedupe.
pub fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// How a value was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// The user said it matters to them.
    Stated,
    /// Inferred from what the user does or chooses.
    Revealed,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stated => "stated",
            Self::Revealed => "revealed",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stated" => Some(Self::Stated),
            "revealed" => Some(Self::Revealed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub id: Uuid,
    pub name: String,
    pub value_type: ValueType,
    pub confidence: f64,
    pub mention_count: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Value {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: normalize_key(&name.into()),
            value_type,
            confidence: bump_confidence(BASE_CONFIDENCE, DEFAULT_INCREMENT),
            mention_count: 1,
            first_seen: now,
            last_seen: now,
        }
    }

    pub fn mention(&mut self) {
        self.confidence = bump_confidence(self.confidence, DEFAULT_INCREMENT);
        self.mention_count += 1;
        self.last_seen = Utc::now();
    }

    pub fn is_confident(&self) -> bool {
        self.confidence >= CLEAR_PATTERN_CONFIDENCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    Active,
    Dormant,
    Resolved,
}

impl Default for ChallengeStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Dormant => "dormant",
            Self::Resolved => "resolved",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "dormant" => Some(Self::Dormant),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub description: String,
    pub status: ChallengeStatus,
    pub mention_count: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Challenge {
    pub fn new(description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: description.into().trim().to_string(),
            status: ChallengeStatus::Active,
            mention_count: 1,
            first_seen: now,
            last_seen: now,
        }
    }

    /// A challenge raised again is active again, whatever its previous status.
    pub fn mention(&mut self) {
        self.mention_count += 1;
        self.status = ChallengeStatus::Active;
        self.last_seen = Utc::now();
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    pub fn is_recurring(&self) -> bool {
        self.mention_count >= 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    InProgress,
    Achieved,
    Abandoned,
}

impl Default for GoalStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::InProgress => "in_progress",
            Self::Achieved => "achieved",
            Self::Abandoned => "abandoned",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "active" => Some(Self::Active),
            "in_progress" => Some(Self::InProgress),
            "achieved" => Some(Self::Achieved),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Active and in-progress goals are the ones still being pursued.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Active | Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub description: String,
    pub status: GoalStatus,
    pub mention_count: u32,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl Goal {
    pub fn new(description: impl Into<String>, status: GoalStatus) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: description.into().trim().to_string(),
            status,
            mention_count: 1,
            first_seen: now,
            last_seen: now,
        }
    }

    pub fn mention(&mut self, status: Option<GoalStatus>) {
        self.mention_count += 1;
        if let Some(status) = status {
            self.status = status;
        }
        self.last_seen = Utc::now();
    }
}

/// Level of Maslow's hierarchy an observation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaslowLevel {
    Physiological,
    Safety,
    Belonging,
    Esteem,
    SelfActualization,
}

impl MaslowLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physiological => "physiological",
            Self::Safety => "safety",
            Self::Belonging => "belonging",
            Self::Esteem => "esteem",
            Self::SelfActualization => "self_actualization",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "physiological" => Some(Self::Physiological),
            "safety" => Some(Self::Safety),
            "belonging" | "love_belonging" | "love" => Some(Self::Belonging),
            "esteem" => Some(Self::Esteem),
            "self_actualization" => Some(Self::SelfActualization),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaslowObservationType {
    /// A need that is currently unmet or under threat.
    Concern,
    /// A need that is currently met.
    Stable,
    /// A need the user is actively reaching towards.
    Aspiration,
}

impl MaslowObservationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concern => "concern",
            Self::Stable => "stable",
            Self::Aspiration => "aspiration",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "concern" => Some(Self::Concern),
            "stable" => Some(Self::Stable),
            "aspiration" => Some(Self::Aspiration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaslowObservation {
    pub id: Uuid,
    pub level: MaslowLevel,
    pub observation_type: MaslowObservationType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl MaslowObservation {
    pub fn new(level: MaslowLevel, observation_type: MaslowObservationType, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            observation_type,
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}

/// What the user is trying to get out of the conversation right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    Venting,
    AdviceSeeking,
    DecisionSupport,
    Planning,
    Reflection,
    Information,
    Validation,
}

impl IntentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Venting => "venting",
            Self::AdviceSeeking => "advice_seeking",
            Self::DecisionSupport => "decision_support",
            Self::Planning => "planning",
            Self::Reflection => "reflection",
            Self::Information => "information",
            Self::Validation => "validation",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "venting" => Some(Self::Venting),
            "advice_seeking" | "advice" => Some(Self::AdviceSeeking),
            "decision_support" | "decision" => Some(Self::DecisionSupport),
            "planning" => Some(Self::Planning),
            "reflection" => Some(Self::Reflection),
            "information" => Some(Self::Information),
            "validation" => Some(Self::Validation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentObservation {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub intent_type: IntentType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl IntentObservation {
    pub fn new(conversation_id: Uuid, intent_type: IntentType, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            intent_type,
            description: description.into(),
            created_at: Utc::now(),
        }
    }
}
