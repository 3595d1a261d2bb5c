//! Error handling and navigation statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, canonicalization and classification
//! - Navigation outcome statistics tracking
//!
//! Classification errors never reach the user directly: the navigation gate
//! turns every unsettled classification into a blocked navigation.

mod stats;
mod types;

// Re-export public API
pub use stats::NavigationStats;
pub use types::{ClassificationError, DomainError, InitializationError, NavigationOutcome};
