//! Collector configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, provider endpoints, probe parameters)
//! - The collector option type and logging enums

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{LogFormat, LogLevel, MetadataConfig};
