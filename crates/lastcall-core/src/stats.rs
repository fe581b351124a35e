//! Aggregate lifecycle counters.

use serde::{Deserialize, Serialize};

/// Monotonic outcome bookkeeping.
///
/// `streak` counts consecutive completions since the last expiration; manual
/// deletion counts as an expiration and resets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub completed: u64,
    pub expired: u64,
    pub streak: u32,
}

impl Counters {
    pub fn record_completion(&mut self) {
        self.completed += 1;
        self.streak = self.streak.saturating_add(1);
    }

    pub fn record_expiration(&mut self) {
        self.expired += 1;
        self.streak = 0;
    }

    /// completed / (completed + expired), or 0.0 before any outcome.
    pub fn success_rate(&self) -> f64 {
        let total = self.completed + self.expired;
        if total == 0 {
            return 0.0;
        }
        self.completed as f64 / total as f64
    }
}
