//! Shared utilities, configuration, and error handling for Coffee-with-Cinema
//!
//! This crate provides common functionality used across the workspace:
//! - Server configuration following 12-factor principles
//! - The JSON error envelope returned by the HTTP API
//! - Request extractors

pub mod config;
pub mod error;
pub mod extractors;

pub use error::{Error, Result};
pub use extractors::ValidatedJson;
