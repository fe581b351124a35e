use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Insertion-ordered store of live tasks.
///
/// Owns its [`Task`] records exclusively: at any stable point in time an id
/// appears either here or in the graveyard, never in both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveStore {
    tasks: Vec<Task>,
}

impl ActiveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Idempotent: removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Tasks ascending by remaining time at `now`.
    ///
    /// The sort is stable and keyed on remaining time only, so tasks with
    /// identical remaining time keep their insertion order between ticks.
    pub fn ordered_by_remaining(&self, now: DateTime<Utc>) -> Vec<&Task> {
        let mut ordered: Vec<&Task> = self.tasks.iter().collect();
        ordered.sort_by_key(|t| t.remaining_ms(now));
        ordered
    }

    /// Ids whose deadline has lapsed at `now`, in insertion order.
    pub fn lapsed(&self, now: DateTime<Utc>) -> Vec<String> {
        self.tasks
            .iter()
            .filter(|t| t.deadline <= now)
            .map(|t| t.id.clone())
            .collect()
    }
}
