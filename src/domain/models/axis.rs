//! Profile axes.
//!
//! An axis is a logical grouping over stored signals and profile entities.
//! Axes are never persisted; completeness is always computed on demand.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dimension-key prefix for life situation sub-dimensions (`life_situation.work_status`).
pub const LIFE_SITUATION_PREFIX: &str = "life_situation.";
/// Dimension-key prefix for moral foundation signals (`moral.care`).
pub const MORAL_PREFIX: &str = "moral.";
/// Dimension-key prefix for Big Five trait signals (`big_five.openness`).
pub const BIG_FIVE_PREFIX: &str = "big_five.";

/// The five traits scored under [`BIG_FIVE_PREFIX`].
pub const BIG_FIVE_TRAITS: [&str; 5] = [
    "openness",
    "conscientiousness",
    "extraversion",
    "agreeableness",
    "neuroticism",
];

/// The moral foundations scored under [`MORAL_PREFIX`].
pub const MORAL_FOUNDATIONS: [&str; 6] = ["care", "fairness", "loyalty", "authority", "sanctity", "liberty"];

/// Whether a dimension key is tracked by some axis.
///
/// Single-signal axes use their own name. `life_situation.` takes any
/// one-segment leaf; `moral.` and `big_five.` only take their fixed leaves.
pub fn is_known_dimension(dimension: &str) -> bool {
    let dimension = dimension.trim().to_lowercase();
    if let Some(axis) = Axis::from_str(&dimension) {
        return axis.is_single_signal();
    }
    if let Some(leaf) = dimension.strip_prefix(LIFE_SITUATION_PREFIX) {
        return !leaf.is_empty() && !leaf.contains('.');
    }
    if let Some(leaf) = dimension.strip_prefix(MORAL_PREFIX) {
        return MORAL_FOUNDATIONS.contains(&leaf);
    }
    if let Some(leaf) = dimension.strip_prefix(BIG_FIVE_PREFIX) {
        return BIG_FIVE_TRAITS.contains(&leaf);
    }
    false
}

/// Priority band grouping axes by how early they should be gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisTier {
    Essential = 1,
    Core = 2,
    Disposition = 3,
    Nuance = 4,
}

impl AxisTier {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Essential),
            2 => Some(Self::Core),
            3 => Some(Self::Disposition),
            4 => Some(Self::Nuance),
            _ => None,
        }
    }
}

/// One of the nineteen tracked profile dimensions.
///
/// Variant order is the enumeration order used to break priority ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    MaslowStatus,
    SupportSeekingStyle,
    LifeSituation,
    ImmediateIntent,
    CoreValues,
    CurrentChallenges,
    Goals,
    MoralFoundations,
    BigFive,
    RiskTolerance,
    MotivationStyle,
    AttachmentStyle,
    LocusOfControl,
    TemporalOrientation,
    GrowthMindset,
    ChangeReadiness,
    StressResponse,
    EmotionalRegulation,
    SelfEfficacy,
}

impl Axis {
    /// Every axis in enumeration order.
    pub const ALL: [Axis; 19] = [
        Axis::MaslowStatus,
        Axis::SupportSeekingStyle,
        Axis::LifeSituation,
        Axis::ImmediateIntent,
        Axis::CoreValues,
        Axis::CurrentChallenges,
        Axis::Goals,
        Axis::MoralFoundations,
        Axis::BigFive,
        Axis::RiskTolerance,
        Axis::MotivationStyle,
        Axis::AttachmentStyle,
        Axis::LocusOfControl,
        Axis::TemporalOrientation,
        Axis::GrowthMindset,
        Axis::ChangeReadiness,
        Axis::StressResponse,
        Axis::EmotionalRegulation,
        Axis::SelfEfficacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaslowStatus => "maslow_status",
            Self::SupportSeekingStyle => "support_seeking_style",
            Self::LifeSituation => "life_situation",
            Self::ImmediateIntent => "immediate_intent",
            Self::CoreValues => "core_values",
            Self::CurrentChallenges => "current_challenges",
            Self::Goals => "goals",
            Self::MoralFoundations => "moral_foundations",
            Self::BigFive => "big_five",
            Self::RiskTolerance => "risk_tolerance",
            Self::MotivationStyle => "motivation_style",
            Self::AttachmentStyle => "attachment_style",
            Self::LocusOfControl => "locus_of_control",
            Self::TemporalOrientation => "temporal_orientation",
            Self::GrowthMindset => "growth_mindset",
            Self::ChangeReadiness => "change_readiness",
            Self::StressResponse => "stress_response",
            Self::EmotionalRegulation => "emotional_regulation",
            Self::SelfEfficacy => "self_efficacy",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|axis| axis.as_str() == normalized)
    }

    /// Human-readable label used in rendered context.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MaslowStatus => "Needs (Maslow)",
            Self::SupportSeekingStyle => "Support style",
            Self::LifeSituation => "Life situation",
            Self::ImmediateIntent => "Immediate intent",
            Self::CoreValues => "Core values",
            Self::CurrentChallenges => "Current challenges",
            Self::Goals => "Goals",
            Self::MoralFoundations => "Moral foundations",
            Self::BigFive => "Big Five",
            Self::RiskTolerance => "Risk tolerance",
            Self::MotivationStyle => "Motivation style",
            Self::AttachmentStyle => "Attachment style",
            Self::LocusOfControl => "Locus of control",
            Self::TemporalOrientation => "Temporal orientation",
            Self::GrowthMindset => "Growth mindset",
            Self::ChangeReadiness => "Change readiness",
            Self::StressResponse => "Stress response",
            Self::EmotionalRegulation => "Emotional regulation",
            Self::SelfEfficacy => "Self-efficacy",
        }
    }

    pub fn tier(&self) -> AxisTier {
        match self {
            Self::MaslowStatus
            | Self::SupportSeekingStyle
            | Self::LifeSituation
            | Self::ImmediateIntent => AxisTier::Essential,
            Self::CoreValues | Self::CurrentChallenges | Self::Goals | Self::MoralFoundations => {
                AxisTier::Core
            }
            Self::BigFive | Self::RiskTolerance | Self::MotivationStyle => AxisTier::Disposition,
            Self::AttachmentStyle
            | Self::LocusOfControl
            | Self::TemporalOrientation
            | Self::GrowthMindset
            | Self::ChangeReadiness
            | Self::StressResponse
            | Self::EmotionalRegulation
            | Self::SelfEfficacy => AxisTier::Nuance,
        }
    }

    /// Static importance weight in (0, 1].
    pub fn weight(&self) -> f64 {
        match self {
            Self::MaslowStatus | Self::SupportSeekingStyle => 1.0,
            Self::LifeSituation | Self::ImmediateIntent => 0.9,
            Self::CoreValues => 0.85,
            Self::CurrentChallenges => 0.8,
            Self::Goals => 0.75,
            Self::MoralFoundations => 0.7,
            Self::BigFive => 0.6,
            Self::RiskTolerance => 0.55,
            Self::MotivationStyle => 0.5,
            Self::AttachmentStyle | Self::LocusOfControl => 0.4,
            Self::TemporalOrientation => 0.35,
            Self::GrowthMindset | Self::ChangeReadiness => 0.3,
            Self::StressResponse | Self::EmotionalRegulation | Self::SelfEfficacy => 0.25,
        }
    }

    /// Axes scored directly from one signal stored under the axis name.
    pub fn is_single_signal(&self) -> bool {
        matches!(
            self,
            Self::SupportSeekingStyle
                | Self::RiskTolerance
                | Self::MotivationStyle
                | Self::AttachmentStyle
                | Self::LocusOfControl
                | Self::TemporalOrientation
                | Self::GrowthMindset
                | Self::ChangeReadiness
                | Self::StressResponse
                | Self::EmotionalRegulation
                | Self::SelfEfficacy
        )
    }

    pub fn in_tier(tier: AxisTier) -> impl Iterator<Item = Axis> {
        Self::ALL.into_iter().filter(move |axis| axis.tier() == tier)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
