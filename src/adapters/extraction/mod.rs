//! Observation extractor adapters.

pub mod llm_extractor;

pub use llm_extractor::{parse_batch, LlmObservationExtractor};
