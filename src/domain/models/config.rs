use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for rapport
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Guided-mode pacing
    #[serde(default)]
    pub guided_mode: GuidedModeConfig,

    /// Context assembly limits
    #[serde(default)]
    pub context: ContextConfig,

    /// Embedding provider used for passage retrieval
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".rapport/rapport.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Guided-mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuidedModeConfig {
    /// Non-diverted user turns after which guided mode stands down
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
}

const fn default_max_turns() -> u32 {
    7
}

impl Default for GuidedModeConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

/// Context assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContextConfig {
    /// Recent messages included verbatim
    #[serde(default = "default_history_messages")]
    pub history_messages: usize,

    /// Similar passages retrieved per turn
    #[serde(default = "default_passage_limit")]
    pub passage_limit: usize,

    /// Character cap applied to each retrieved passage
    #[serde(default = "default_passage_chars")]
    pub passage_chars: usize,

    /// Signals below this confidence are left out of the profile summary
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Timeout for the embed + search round trip
    #[serde(default = "default_retrieval_timeout_ms")]
    pub retrieval_timeout_ms: u64,

    #[serde(default = "default_value_limit")]
    pub value_limit: usize,

    #[serde(default = "default_challenge_limit")]
    pub challenge_limit: usize,

    #[serde(default = "default_maslow_limit")]
    pub maslow_limit: usize,

    #[serde(default = "default_goal_limit")]
    pub goal_limit: usize,
}

const fn default_history_messages() -> usize {
    10
}

const fn default_passage_limit() -> usize {
    3
}

const fn default_passage_chars() -> usize {
    200
}

const fn default_confidence_floor() -> f64 {
    0.5
}

const fn default_retrieval_timeout_ms() -> u64 {
    3000
}

const fn default_value_limit() -> usize {
    5
}

const fn default_challenge_limit() -> usize {
    3
}

const fn default_maslow_limit() -> usize {
    5
}

const fn default_goal_limit() -> usize {
    3
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            history_messages: default_history_messages(),
            passage_limit: default_passage_limit(),
            passage_chars: default_passage_chars(),
            confidence_floor: default_confidence_floor(),
            retrieval_timeout_ms: default_retrieval_timeout_ms(),
            value_limit: default_value_limit(),
            challenge_limit: default_challenge_limit(),
            maslow_limit: default_maslow_limit(),
            goal_limit: default_goal_limit(),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingsConfig {
    /// Provider: none or openai
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// API key; falls back to `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,

    /// Prepended to text embedded in query mode
    #[serde(default)]
    pub query_prefix: String,

    /// Prepended to text embedded in document mode
    #[serde(default)]
    pub document_prefix: String,
}

fn default_embedding_provider() -> String {
    "none".to_string()
}

fn default_embedding_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_embedding_dimension() -> usize {
    1536
}

const fn default_embedding_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            api_key: None,
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout_secs(),
            query_prefix: String::new(),
            document_prefix: String::new(),
        }
    }
}
