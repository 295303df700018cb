pub mod axis;
pub mod completeness;
pub mod config;
pub mod context;
pub mod conversation;
pub mod evidence;
pub mod extraction;
pub mod guided_mode;
pub mod profile;
pub mod question;
pub mod signal;

pub use axis::{
    is_known_dimension, Axis, AxisTier, BIG_FIVE_PREFIX, BIG_FIVE_TRAITS, LIFE_SITUATION_PREFIX,
    MORAL_FOUNDATIONS, MORAL_PREFIX,
};
pub use completeness::{evaluate_tiers, AxisCompleteness, AxisPriority, CompletenessScore, TierRule};
pub use config::{
    Config, ContextConfig, DatabaseConfig, EmbeddingsConfig, GuidedModeConfig, LoggingConfig,
};
pub use context::{estimate_size, AssembledContext, SimilarPassage};
pub use conversation::{Conversation, Message, MessageRole};
pub use evidence::{Evidence, EvidenceTarget};
pub use extraction::{
    ExtractedChallenge, ExtractedGoal, ExtractedIntent, ExtractedMaslow, ExtractedSignal,
    ExtractedValue, ExtractionBatch, ExtractionReport,
};
pub use guided_mode::{DeactivationReason, GuidedModeDecision, GuidedModeState};
pub use profile::{
    normalize_key, Challenge, ChallengeStatus, Goal, GoalStatus, IntentObservation, IntentType,
    MaslowLevel, MaslowObservation, MaslowObservationType, Value, ValueType,
};
pub use question::{Question, QuestionType};
pub use signal::{
    bump_confidence, Grounding, Signal, SignalObservation, UpsertOutcome, BASE_CONFIDENCE,
    CLEAR_PATTERN_CONFIDENCE, DEFAULT_INCREMENT, MAX_CONFIDENCE,
};
