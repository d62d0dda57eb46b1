//! Error handling.
//!
//! This module provides:
//! - Error type definitions for every component
//! - Provider failure categories used in log output
//! - Categorization of `reqwest` transport errors
//!
//! Only `ClassifierError` ever reaches a collector caller. Fingerprint and
//! provider errors are demoted to warnings and an omitted field.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use types::{
    ClassifierError, ConfigError, EnvironmentError, FingerprintError, InitializationError,
    ProviderError, ProviderFailureKind,
};
