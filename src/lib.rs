//! Rapport - evidence-gated conversational profile engine
//!
//! Rapport keeps a psychological profile of one user, built only from
//! observations that quote the user's own words. It scores how complete each
//! of 19 profile axes is, steers early conversations towards the biggest gaps,
//! and assembles the profile into prompt context for each reply.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, port traits and errors
//! - **Service Layer** (`services`): signal store, completeness engine, guided mode,
//!   context assembly, extraction and the conversation pipeline
//! - **Adapters** (`adapters`): SQLite repositories, embeddings, LLM extraction
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Axis, AxisCompleteness, AxisTier, CompletenessScore, Config, Evidence, Signal,
    SignalObservation, UpsertOutcome,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    CompletenessEngine, ContextAssembler, ConversationService, GuidedModeController, PriorityCalculator,
    QuestionBank, SignalStore,
};
