//! Deadline urgency classification.
//!
//! Maps remaining time to one of four ordered urgency states. Pure
//! wall-clock arithmetic: the caller supplies `now`, so classification is
//! deterministic and must be re-derived on every tick rather than cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Remaining time at or below this is already terminal, even though the
/// task has not yet expired.
pub const TERMINAL_WINDOW_MS: i64 = 60_000;
/// Upper bound of the critical band (15 minutes).
pub const CRITICAL_WINDOW_MS: i64 = 15 * 60_000;
/// Upper bound of the elevated band (2 hours).
pub const ELEVATED_WINDOW_MS: i64 = 2 * 60 * 60_000;

/// Urgency state of an active task, ordered from calmest to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Stable,
    Elevated,
    Critical,
    Terminal,
}

/// Classify a deadline relative to `now`.
///
/// Expired deadlines (remaining <= 0) are Terminal, as is the final minute
/// before expiry.
pub fn classify(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Urgency {
    let remaining_ms = (deadline - now).num_milliseconds();
    if remaining_ms <= TERMINAL_WINDOW_MS {
        Urgency::Terminal
    } else if remaining_ms <= CRITICAL_WINDOW_MS {
        Urgency::Critical
    } else if remaining_ms <= ELEVATED_WINDOW_MS {
        Urgency::Elevated
    } else {
        Urgency::Stable
    }
}
