use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pending hold-to-confirm timers for resurrection, keyed by grave id.
///
/// At most one timer per id: beginning a new hold replaces the previous one
/// rather than stacking. Releasing the gesture before the timer fires
/// cancels it with no residual effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldTracker {
    pending: HashMap<String, DateTime<Utc>>,
}

impl HoldTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    /// Start (or restart) the hold for `id`, firing at `fires_at`.
    pub fn begin(&mut self, id: &str, fires_at: DateTime<Utc>) {
        self.pending.insert(id.to_string(), fires_at);
    }

    /// The releasing gesture. Returns whether a timer was pending.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Drop a timer whose target no longer exists (eviction, permanent
    /// deletion).
    pub fn invalidate(&mut self, id: &str) {
        self.pending.remove(id);
    }

    /// Keep only timers whose id satisfies the predicate.
    pub fn retain<F: Fn(&str) -> bool>(&mut self, keep: F) {
        self.pending.retain(|id, _| keep(id));
    }

    /// Remove and return the ids of all timers due at `now`, sorted for a
    /// deterministic firing order.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<String> {
        let mut due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, fires_at)| **fires_at <= now)
            .map(|(id, _)| id.clone())
            .collect();
        due.sort();
        for id in &due {
            self.pending.remove(id);
        }
        due
    }
}
