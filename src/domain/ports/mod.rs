//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - SignalRepository / EvidenceRepository / ProfileRepository: the profile store
//! - ConversationRepository: conversations and messages
//! - EmbeddingProvider / SimilarityIndex: passage retrieval
//! - Generator: response generation
//! - ObservationExtractor: structured observations from user text

pub mod conversation_repository;
pub mod embedding;
pub mod evidence_repository;
pub mod extractor;
pub mod generator;
pub mod null_embedding;
pub mod profile_repository;
pub mod signal_repository;
pub mod similarity_index;

pub use conversation_repository::ConversationRepository;
pub use embedding::{EmbeddingMode, EmbeddingProvider};
pub use evidence_repository::EvidenceRepository;
pub use extractor::ObservationExtractor;
pub use generator::Generator;
pub use null_embedding::NullEmbeddingProvider;
pub use profile_repository::ProfileRepository;
pub use signal_repository::SignalRepository;
pub use similarity_index::SimilarityIndex;
