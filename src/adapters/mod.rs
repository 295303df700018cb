//! Infrastructure adapters for external systems.

pub mod embeddings;
pub mod extraction;
pub mod sqlite;
