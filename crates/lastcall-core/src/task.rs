//! Task and grave-entry records.
//!
//! A [`Task`] is a live unit of work with a hard deadline. Once the deadline
//! lapses (or the task is manually deleted) it becomes a [`GraveEntry`] and
//! is retained for a fixed recovery window. Names are untrusted user text
//! and are stored verbatim after trimming and truncation -- escaping is a
//! presentation concern and does not happen here.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum stored name length in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// A live, deadline-bound task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl Task {
    /// Build a task from untrusted user input.
    ///
    /// The name is trimmed and truncated to [`MAX_NAME_CHARS`]; only an
    /// empty result is rejected. A non-positive duration is allowed -- the
    /// task simply expires on the first tick.
    pub fn new(
        name: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = sanitize_name(name)?;
        Ok(Self {
            id: generate_id(now),
            name,
            deadline: now + duration,
            created: now,
        })
    }

    /// Re-admit a grave entry as a brand-new task: fresh id, the original
    /// relative duration, a new absolute deadline.
    pub fn resurrected(entry: &GraveEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(now),
            name: entry.name.clone(),
            deadline: now + entry.original_duration(),
            created: now,
        }
    }

    /// Milliseconds until the deadline; negative once it has lapsed.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        (self.deadline - now).num_milliseconds()
    }
}

/// A task captured at its moment of migration into the graveyard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraveEntry {
    /// Reused from the original task.
    pub id: String,
    pub name: String,
    pub deadline: DateTime<Utc>,
    pub created: DateTime<Utc>,
    /// The wall-clock moment of migration, not the original deadline.
    pub expired_at: DateTime<Utc>,
}

impl GraveEntry {
    /// Capture a task at its moment of migration.
    pub fn bury(task: Task, expired_at: DateTime<Utc>) -> Self {
        Self {
            id: task.id,
            name: task.name,
            deadline: task.deadline,
            created: task.created,
            expired_at,
        }
    }

    /// The relative duration the task was originally given. This is what
    /// resurrection preserves; the absolute deadline is not restored.
    pub fn original_duration(&self) -> Duration {
        self.deadline - self.created
    }
}

pub(crate) fn sanitize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.chars().take(MAX_NAME_CHARS).collect())
}

/// Epoch-millis base plus a random suffix. Uniqueness is probabilistic but
/// the suffix space makes collisions negligible.
pub(crate) fn generate_id(now: DateTime<Utc>) -> String {
    format!("{:x}-{:08x}", now.timestamp_millis(), rand::random::<u32>())
}
