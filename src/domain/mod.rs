//! Domain layer for the rapport profile engine
//!
//! This module contains core models, port traits and the domain error type.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
