//! CLI command implementations.

pub mod context;
pub mod init;
pub mod profile;
pub mod question;
pub mod reset;
pub mod signal;
