//! Library configuration and constants.
//!
//! This module provides:
//! - Configuration constants (cache sizing, history search bounds, protocols)
//! - The `Config` struct and its validation

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ConfigValidationError, IncognitoSupport, LogFormat, LogLevel};
