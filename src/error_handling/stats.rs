//! Navigation statistics tracking.
//!
//! Thread-safe counters for navigation outcomes, shared between concurrent
//! navigation decisions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::NavigationOutcome;

/// Thread-safe navigation outcome tracker.
///
/// All outcomes are initialized to zero on creation. Share across tasks with `Arc`.
pub struct NavigationStats {
    outcomes: HashMap<NavigationOutcome, AtomicUsize>,
}

impl NavigationStats {
    /// Creates a tracker with every outcome counter at zero.
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in NavigationOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }
        NavigationStats { outcomes }
    }

    /// Increment the counter for an outcome.
    pub fn increment(&self, outcome: NavigationOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map. \
                 This indicates a bug in NavigationStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome.
    pub fn get_count(&self, outcome: NavigationOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Total number of decisions recorded.
    pub fn total(&self) -> usize {
        self.outcomes.values().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    /// Number of decisions that blocked the navigation.
    pub fn total_blocked(&self) -> usize {
        NavigationOutcome::iter()
            .filter(NavigationOutcome::is_blocked)
            .map(|o| self.get_count(o))
            .sum()
    }
}

impl Default for NavigationStats {
    fn default() -> Self {
        Self::new()
    }
}
