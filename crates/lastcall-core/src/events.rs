use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{GraveEntry, Task};

/// How a task ended up in the graveyard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurialCause {
    /// Deadline lapsed.
    Expired,
    /// Manual deletion; routes through the same migration path.
    Deleted,
}

/// Every state change in the system produces exactly one Event.
/// The CLI prints them; a GUI collaborator would poll for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCreated {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        id: String,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// Deadline lapsed; burial is pending the settle delay and can no
    /// longer be prevented.
    TaskExpiring {
        id: String,
        at: DateTime<Utc>,
    },
    TaskBuried {
        entry: GraveEntry,
        cause: BurialCause,
        at: DateTime<Utc>,
    },
    /// Retention window elapsed; the entry is gone for good.
    GraveEvicted {
        id: String,
        at: DateTime<Utc>,
    },
    GraveResurrected {
        grave_id: String,
        task: Task,
        at: DateTime<Utc>,
    },
    /// Explicit permanent deletion, bypassing retention.
    GraveDeleted {
        id: String,
        at: DateTime<Utc>,
    },
}
