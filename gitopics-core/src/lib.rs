//! Gitopics Core - shared data structures, configuration, and error handling
//!
//! This crate defines the repository record model, the unified error type,
//! and the configuration/logging infrastructure used by the other crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
