//! Time-boxed recovery store for expired and deleted tasks.
//!
//! Entries are retained for a fixed 24-hour window from the moment of
//! migration, then evicted unconditionally and silently.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::task::GraveEntry;

/// Fixed retention window, in hours, from `expired_at`.
pub const RETENTION_HOURS: i64 = 24;

fn retention() -> Duration {
    Duration::hours(RETENTION_HOURS)
}

/// Display-only remaining retention in milliseconds, clamped at zero.
///
/// Never used for eviction decisions -- [`GraveyardStore::sweep`] always
/// re-derives from `now - expired_at`.
pub fn remaining_retention_ms(entry: &GraveEntry, now: DateTime<Utc>) -> i64 {
    (retention() - (now - entry.expired_at))
        .num_milliseconds()
        .max(0)
}

/// The graveyard: entries in migration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraveyardStore {
    entries: Vec<GraveEntry>,
}

impl GraveyardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Silently overwrites an existing entry with the same id. Store
    /// disjointness means that should not occur, but it is not an error.
    pub fn insert(&mut self, entry: GraveEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<GraveEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&GraveEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraveEntry> {
        self.entries.iter()
    }

    /// Evict exactly the entries whose retention window has elapsed
    /// (`now - expired_at >= 24h`), returning them in migration order.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Vec<GraveEntry> {
        let mut evicted = Vec::new();
        self.entries.retain(|e| {
            if now - e.expired_at >= retention() {
                evicted.push(e.clone());
                false
            } else {
                true
            }
        });
        evicted
    }
}
