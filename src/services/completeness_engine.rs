//! Per-axis completeness scoring.
//!
//! Each axis gathers a small facts struct from the stores and runs it through
//! an ordered tier table. Scores are recomputed on every call.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    evaluate_tiers, Axis, AxisCompleteness, Challenge, ChallengeStatus, CompletenessScore, Goal,
    GoalStatus, MaslowObservation, MaslowObservationType, Signal, TierRule, Value, ValueType,
    BIG_FIVE_PREFIX, BIG_FIVE_TRAITS, CLEAR_PATTERN_CONFIDENCE, LIFE_SITUATION_PREFIX,
    MORAL_FOUNDATIONS, MORAL_PREFIX,
};
use crate::domain::ports::{ProfileRepository, SignalRepository};

/// Facts for axes scored on a single signal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SingleSignalFacts {
    pub confidence: Option<f64>,
}

impl SingleSignalFacts {
    pub fn from_signal(signal: Option<&Signal>) -> Self {
        Self {
            confidence: signal.map(|s| s.confidence),
        }
    }
}

/// Facts for axes scored on a set of keyed signals or distinct types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountFacts {
    pub count: usize,
    pub any_confident: bool,
}

impl CountFacts {
    pub fn from_signals(signals: &[Signal]) -> Self {
        Self {
            count: signals.len(),
            any_confident: signals.iter().any(Signal::is_clear_pattern),
        }
    }

    /// Count only signals whose key leaf is one of `leaves`.
    pub fn from_fixed_leaves(signals: &[Signal], leaves: &[&str]) -> Self {
        let tracked: Vec<Signal> = signals.iter().filter(|s| leaves.contains(&s.leaf())).cloned().collect();
        Self::from_signals(&tracked)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaslowFacts {
    pub observations: usize,
    pub levels: usize,
    pub has_concern: bool,
    pub has_stable: bool,
}

impl MaslowFacts {
    pub fn from_observations(observations: &[MaslowObservation]) -> Self {
        let levels: BTreeSet<_> = observations.iter().map(|o| o.level).collect();
        let has_type = |t: MaslowObservationType| observations.iter().any(|o| o.observation_type == t);
        Self {
            observations: observations.len(),
            levels: levels.len(),
            has_concern: has_type(MaslowObservationType::Concern),
            has_stable: has_type(MaslowObservationType::Stable),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueFacts {
    pub count: usize,
    pub has_stated: bool,
    pub has_revealed: bool,
    pub any_confident: bool,
}

impl ValueFacts {
    pub fn from_values(values: &[Value]) -> Self {
        Self {
            count: values.len(),
            has_stated: values.iter().any(|v| v.value_type == ValueType::Stated),
            has_revealed: values.iter().any(|v| v.value_type == ValueType::Revealed),
            any_confident: values.iter().any(Value::is_confident),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChallengeFacts {
    pub active: usize,
    pub recurring: usize,
}

impl ChallengeFacts {
    /// Only active challenges count.
    pub fn from_challenges(challenges: &[Challenge]) -> Self {
        let active: Vec<_> = challenges.iter().filter(|c| c.is_active()).collect();
        Self {
            active: active.len(),
            recurring: active.iter().filter(|c| c.is_recurring()).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalFacts {
    pub open: usize,
    pub in_progress: bool,
}

impl GoalFacts {
    pub fn from_goals(goals: &[Goal]) -> Self {
        Self {
            open: goals.iter().filter(|g| g.status.is_open()).count(),
            in_progress: goals.iter().any(|g| g.status == GoalStatus::InProgress),
        }
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

static SINGLE_SIGNAL_RULES: [TierRule<SingleSignalFacts>; 3] = [
    TierRule::new(
        CompletenessScore::Complete,
        |f| f.confidence.is_some_and(|c| c >= CLEAR_PATTERN_CONFIDENCE),
        |f| format!("clear pattern (confidence {:.2})", f.confidence.unwrap_or_default()),
    ),
    TierRule::new(
        CompletenessScore::Partial,
        |f| f.confidence.is_some(),
        |f| format!("tentative (confidence {:.2})", f.confidence.unwrap_or_default()),
    ),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no signal".to_string()),
];

static MASLOW_RULES: [TierRule<MaslowFacts>; 5] = [
    TierRule::new(
        CompletenessScore::Complete,
        |f| f.levels >= 4 && f.has_concern && f.has_stable,
        |f| format!("{} levels with both concerns and stable needs", f.levels),
    ),
    TierRule::new(
        CompletenessScore::Substantial,
        |f| f.levels >= 3,
        |f| format!("{} levels touched", f.levels),
    ),
    TierRule::new(
        CompletenessScore::Partial,
        |f| f.has_concern,
        |f| format!("concern noted across {}", plural(f.levels, "level")),
    ),
    TierRule::new(
        CompletenessScore::Sparse,
        |f| f.observations >= 1,
        |f| format!("{} across {}", plural(f.observations, "observation"), plural(f.levels, "level")),
    ),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no Maslow observations".to_string()),
];

static LIFE_SITUATION_RULES: [TierRule<CountFacts>; 5] = [
    TierRule::new(CompletenessScore::Complete, |f| f.count >= 4, |f| format!("{} known", plural(f.count, "sub-dimension"))),
    TierRule::new(CompletenessScore::Substantial, |f| f.count == 3, |_| "3 sub-dimensions known".to_string()),
    TierRule::new(CompletenessScore::Partial, |f| f.count == 2, |_| "2 sub-dimensions known".to_string()),
    TierRule::new(CompletenessScore::Sparse, |f| f.count == 1, |_| "1 sub-dimension known".to_string()),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no life situation details".to_string()),
];

static INTENT_RULES: [TierRule<CountFacts>; 3] = [
    TierRule::new(CompletenessScore::Complete, |f| f.count >= 2, |f| format!("{} distinct intent types observed", f.count)),
    TierRule::new(CompletenessScore::Partial, |f| f.count == 1, |_| "1 intent type observed".to_string()),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no intents observed".to_string()),
];

static VALUE_RULES: [TierRule<ValueFacts>; 5] = [
    TierRule::new(
        CompletenessScore::Complete,
        |f| f.count >= 5 && f.has_stated && f.has_revealed && f.any_confident,
        |f| format!("{} values, stated and revealed, with a confident value", f.count),
    ),
    TierRule::new(
        CompletenessScore::Substantial,
        |f| f.count >= 5 || (f.count >= 3 && f.any_confident),
        |f| format!("{} values", f.count),
    ),
    TierRule::new(CompletenessScore::Partial, |f| f.count >= 3, |f| format!("{} values", f.count)),
    TierRule::new(CompletenessScore::Sparse, |f| f.count >= 1, |f| plural(f.count, "value")),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no values recorded".to_string()),
];

static CHALLENGE_RULES: [TierRule<ChallengeFacts>; 3] = [
    TierRule::new(
        CompletenessScore::Complete,
        |f| f.active >= 3 || (f.active >= 2 && f.recurring >= 1),
        |f| format!("{} active, {} recurring", plural(f.active, "challenge"), f.recurring),
    ),
    TierRule::new(
        CompletenessScore::Partial,
        |f| f.active >= 1,
        |f| format!("{} active", plural(f.active, "challenge")),
    ),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no active challenges".to_string()),
];

static GOAL_RULES: [TierRule<GoalFacts>; 3] = [
    TierRule::new(
        CompletenessScore::Complete,
        |f| f.open >= 3 || (f.open >= 1 && f.in_progress),
        |f| format!("{} open{}", plural(f.open, "goal"), if f.in_progress { ", one in progress" } else { "" }),
    ),
    TierRule::new(CompletenessScore::Partial, |f| f.open >= 1, |f| format!("{} open", plural(f.open, "goal"))),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no open goals".to_string()),
];

static MORAL_RULES: [TierRule<CountFacts>; 3] = [
    TierRule::new(
        CompletenessScore::Complete,
        |f| f.count >= 3 || (f.count >= 2 && f.any_confident),
        |f| format!("{} observed", plural(f.count, "foundation")),
    ),
    TierRule::new(CompletenessScore::Partial, |f| f.count >= 1, |f| format!("{} observed", plural(f.count, "foundation"))),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no moral foundations observed".to_string()),
];

static BIG_FIVE_RULES: [TierRule<CountFacts>; 4] = [
    TierRule::new(CompletenessScore::Complete, |f| f.count >= 4, |f| format!("{} of 5 traits", f.count)),
    TierRule::new(CompletenessScore::Partial, |f| f.count >= 2, |f| format!("{} of 5 traits", f.count)),
    TierRule::new(CompletenessScore::Sparse, |f| f.count == 1, |_| "1 of 5 traits".to_string()),
    TierRule::new(CompletenessScore::Unknown, |_| true, |_| "no traits observed".to_string()),
];

pub fn score_single_signal(axis: Axis, facts: &SingleSignalFacts) -> AxisCompleteness {
    evaluate_tiers(axis, facts, &SINGLE_SIGNAL_RULES)
}

pub fn score_maslow(facts: &MaslowFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::MaslowStatus, facts, &MASLOW_RULES)
}

pub fn score_life_situation(facts: &CountFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::LifeSituation, facts, &LIFE_SITUATION_RULES)
}

pub fn score_immediate_intent(facts: &CountFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::ImmediateIntent, facts, &INTENT_RULES)
}

pub fn score_core_values(facts: &ValueFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::CoreValues, facts, &VALUE_RULES)
}

pub fn score_current_challenges(facts: &ChallengeFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::CurrentChallenges, facts, &CHALLENGE_RULES)
}

pub fn score_goals(facts: &GoalFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::Goals, facts, &GOAL_RULES)
}

pub fn score_moral_foundations(facts: &CountFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::MoralFoundations, facts, &MORAL_RULES)
}

pub fn score_big_five(facts: &CountFacts) -> AxisCompleteness {
    evaluate_tiers(Axis::BigFive, facts, &BIG_FIVE_RULES)
}

/// Computes completeness views over the signal and profile stores.
#[derive(Clone)]
pub struct CompletenessEngine {
    signals: Arc<dyn SignalRepository>,
    profile: Arc<dyn ProfileRepository>,
}

impl CompletenessEngine {
    pub fn new(signals: Arc<dyn SignalRepository>, profile: Arc<dyn ProfileRepository>) -> Self {
        Self { signals, profile }
    }

    pub async fn axis_completeness(&self, axis: Axis) -> DomainResult<AxisCompleteness> {
        let result = match axis {
            Axis::MaslowStatus => {
                let observations = self.profile.list_maslow(None).await?;
                score_maslow(&MaslowFacts::from_observations(&observations))
            }
            Axis::LifeSituation => {
                let signals = self.signals.list_by_prefix(LIFE_SITUATION_PREFIX).await?;
                score_life_situation(&CountFacts::from_signals(&signals))
            }
            Axis::ImmediateIntent => {
                let types = self.profile.distinct_intent_types().await?;
                score_immediate_intent(&CountFacts {
                    count: types.len(),
                    any_confident: false,
                })
            }
            Axis::CoreValues => {
                let values = self.profile.list_values().await?;
                score_core_values(&ValueFacts::from_values(&values))
            }
            Axis::CurrentChallenges => {
                let challenges = self.profile.list_challenges(Some(ChallengeStatus::Active)).await?;
                score_current_challenges(&ChallengeFacts::from_challenges(&challenges))
            }
            Axis::Goals => {
                let goals = self.profile.list_goals().await?;
                score_goals(&GoalFacts::from_goals(&goals))
            }
            Axis::MoralFoundations => {
                let signals = self.signals.list_by_prefix(MORAL_PREFIX).await?;
                score_moral_foundations(&CountFacts::from_fixed_leaves(&signals, &MORAL_FOUNDATIONS))
            }
            Axis::BigFive => {
                let signals = self.signals.list_by_prefix(BIG_FIVE_PREFIX).await?;
                score_big_five(&CountFacts::from_fixed_leaves(&signals, &BIG_FIVE_TRAITS))
            }
            Axis::SupportSeekingStyle
            | Axis::RiskTolerance
            | Axis::MotivationStyle
            | Axis::AttachmentStyle
            | Axis::LocusOfControl
            | Axis::TemporalOrientation
            | Axis::GrowthMindset
            | Axis::ChangeReadiness
            | Axis::StressResponse
            | Axis::EmotionalRegulation
            | Axis::SelfEfficacy => {
                let signal = self.signals.get_by_dimension(axis.as_str()).await?;
                score_single_signal(axis, &SingleSignalFacts::from_signal(signal.as_ref()))
            }
        };

        tracing::debug!(axis = %axis, score = %result.score, reason = %result.reason, "Scored axis");
        Ok(result)
    }

    /// Score an axis by name. Unrecognized names get the zero-score sentinel.
    pub async fn completeness_by_name(&self, name: &str) -> DomainResult<AxisCompleteness> {
        match Axis::from_str(name) {
            Some(axis) => self.axis_completeness(axis).await,
            None => Ok(AxisCompleteness::unknown(name)),
        }
    }

    /// Every axis in enumeration order.
    pub async fn all_axis_completeness(&self) -> DomainResult<Vec<AxisCompleteness>> {
        let mut results = Vec::with_capacity(Axis::ALL.len());
        for axis in Axis::ALL {
            results.push(self.axis_completeness(axis).await?);
        }
        Ok(results)
    }

    pub async fn completeness_map(&self) -> DomainResult<HashMap<Axis, f64>> {
        let mut map = HashMap::with_capacity(Axis::ALL.len());
        for axis in Axis::ALL {
            map.insert(axis, self.axis_completeness(axis).await?.value());
        }
        Ok(map)
    }
}
