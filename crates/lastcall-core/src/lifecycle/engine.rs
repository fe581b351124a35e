//! Deadline lifecycle engine.
//!
//! The engine is a wall-clock-based state machine over the active store and
//! the graveyard. It does not use internal threads or timers -- the caller
//! samples the clock, invokes `tick()` periodically (once per second in the
//! reference driver) and passes the same `now` into every direct operation,
//! so tests can drive synthetic time without sleeping.
//!
//! ## Lifecycle
//!
//! ```text
//! ACTIVE -> EXPIRING -> GRAVE      deadline lapse, then the settle delay
//! ACTIVE -> GRAVE                  manual deletion
//! GRAVE  -> (gone)                 24h retention sweep, permanent delete
//! GRAVE  -> ACTIVE'                resurrection: new id, same duration
//! ```
//!
//! All phases of a tick are computed from the one sampled `now`, so
//! classification, migration and eviction within a tick are mutually
//! consistent.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::active::ActiveStore;
use super::graveyard::{remaining_retention_ms, GraveyardStore};
use super::hold::HoldTracker;
use crate::error::ValidationError;
use crate::events::{BurialCause, Event};
use crate::stats::Counters;
use crate::task::{GraveEntry, Task};
use crate::urgency::{classify, Urgency};

/// Timing knobs. The settle delay is presentation-driven and safe to tune;
/// the hold duration is the length of the confirm gesture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    pub settle_delay_ms: u64,
    pub hold_duration_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: 300,
            hold_duration_ms: 3_000,
        }
    }
}

/// A task whose deadline lapsed, awaiting its settle delay before burial.
///
/// Not cancellable: once queued, migration is guaranteed to complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBurial {
    pub id: String,
    pub due: DateTime<Utc>,
}

/// Deferred-operation state (settle queue and hold timers) that survives
/// process restarts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeferredState {
    pub pending: Vec<PendingBurial>,
    pub holds: HoldTracker,
}

/// One active task in a snapshot, with its derived urgency and remaining
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub name: String,
    pub created: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub remaining_ms: i64,
    pub urgency: Urgency,
    /// True while the settle delay runs; burial is already guaranteed.
    pub expiring: bool,
}

/// One grave entry in a snapshot, with its derived remaining retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraveView {
    pub id: String,
    pub name: String,
    pub expired_at: DateTime<Utc>,
    pub remaining_retention_ms: i64,
    pub original_duration_ms: i64,
}

/// The read surface for the rendering collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tasks: Vec<TaskView>,
    pub graveyard: Vec<GraveView>,
    pub counters: Counters,
    pub success_rate: f64,
    pub at: DateTime<Utc>,
}

/// The lifecycle engine: active tasks, graveyard, counters, and the two
/// kinds of deferred operation (settle delays and hold timers).
///
/// Single-threaded by design -- mutation happens either in a direct
/// operation or inside `tick()`, and the caller serializes those.
#[derive(Debug, Clone)]
pub struct LifecycleEngine {
    settings: EngineSettings,
    active: ActiveStore,
    graveyard: GraveyardStore,
    counters: Counters,
    pending: Vec<PendingBurial>,
    holds: HoldTracker,
}

impl LifecycleEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            active: ActiveStore::new(),
            graveyard: GraveyardStore::new(),
            counters: Counters::default(),
            pending: Vec::new(),
            holds: HoldTracker::new(),
        }
    }

    /// Rebuild an engine from persisted state.
    ///
    /// Deferred entries pointing at ids that no longer exist in the
    /// corresponding store are dropped -- stale timers must never fire.
    pub fn restore(
        settings: EngineSettings,
        tasks: Vec<Task>,
        graveyard: Vec<GraveEntry>,
        counters: Counters,
        deferred: DeferredState,
    ) -> Self {
        let mut active = ActiveStore::new();
        for task in tasks {
            active.add(task);
        }
        let mut graves = GraveyardStore::new();
        for entry in graveyard {
            graves.insert(entry);
        }
        let mut pending = deferred.pending;
        pending.retain(|b| active.contains(&b.id));
        let mut holds = deferred.holds;
        holds.retain(|id| graves.contains(id));
        Self {
            settings,
            active,
            graveyard: graves,
            counters,
            pending,
            holds,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn active(&self) -> &ActiveStore {
        &self.active
    }

    pub fn graveyard(&self) -> &GraveyardStore {
        &self.graveyard
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// True while `id` sits in the settle queue.
    pub fn is_expiring(&self, id: &str) -> bool {
        self.pending.iter().any(|b| b.id == id)
    }

    pub fn hold_pending(&self, id: &str) -> bool {
        self.holds.is_pending(id)
    }

    /// Deferred state for persistence.
    pub fn deferred_state(&self) -> DeferredState {
        DeferredState {
            pending: self.pending.clone(),
            holds: self.holds.clone(),
        }
    }

    /// Build the full read snapshot at `now`. Urgency and retention are
    /// re-derived here on every call, never cached.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        let tasks = self
            .active
            .ordered_by_remaining(now)
            .into_iter()
            .map(|t| TaskView {
                id: t.id.clone(),
                name: t.name.clone(),
                created: t.created,
                deadline: t.deadline,
                remaining_ms: t.remaining_ms(now),
                urgency: classify(t.deadline, now),
                expiring: self.is_expiring(&t.id),
            })
            .collect();
        let graveyard = self
            .graveyard
            .iter()
            .map(|e| GraveView {
                id: e.id.clone(),
                name: e.name.clone(),
                expired_at: e.expired_at,
                remaining_retention_ms: remaining_retention_ms(e, now),
                original_duration_ms: e.original_duration().num_milliseconds(),
            })
            .collect();
        Snapshot {
            tasks,
            graveyard,
            counters: self.counters,
            success_rate: self.counters.success_rate(),
            at: now,
        }
    }

    // ── Direct operations ────────────────────────────────────────────

    /// Create a new task due `duration` from `now`.
    pub fn create(
        &mut self,
        name: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Event, ValidationError> {
        let task = Task::new(name, duration, now)?;
        self.active.add(task.clone());
        Ok(Event::TaskCreated { task, at: now })
    }

    /// Complete a task. First mutation wins: an id already queued for
    /// burial is no longer completable, and an unknown id is a no-op.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        if self.is_expiring(id) {
            return None;
        }
        self.active.remove(id)?;
        self.counters.record_completion();
        Some(Event::TaskCompleted {
            id: id.to_string(),
            streak: self.counters.streak,
            at: now,
        })
    }

    /// Manually delete a task. Routes through the same migration path as
    /// expiration: the task is buried immediately, the expired count
    /// increments and the streak resets.
    pub fn delete(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        if self.is_expiring(id) {
            return None;
        }
        let task = self.active.remove(id)?;
        Some(self.bury(task, BurialCause::Deleted, now))
    }

    /// Permanently delete a grave entry, bypassing retention.
    pub fn permanently_delete(&mut self, id: &str, now: DateTime<Utc>) -> Option<Event> {
        let entry = self.graveyard.remove(id)?;
        self.holds.invalidate(id);
        Some(Event::GraveDeleted { id: entry.id, at: now })
    }

    /// Phase 1 of the resurrection gesture: start (or restart) the hold
    /// timer for a grave entry. Returns false when the id is unknown.
    pub fn begin_hold(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        if !self.graveyard.contains(id) {
            return false;
        }
        let fires_at = now + Duration::milliseconds(self.settings.hold_duration_ms as i64);
        self.holds.begin(id, fires_at);
        true
    }

    /// Release the gesture before the timer fires. No state change beyond
    /// dropping the timer.
    pub fn cancel_hold(&mut self, id: &str) -> bool {
        self.holds.cancel(id)
    }

    // ── Tick ─────────────────────────────────────────────────────────

    /// One pass of the periodic driver. Every phase uses the same sampled
    /// `now`. Returns the events produced, exactly one per state change.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();

        // Burials whose settle delay has elapsed.
        let mut due = Vec::new();
        self.pending.retain(|b| {
            if b.due <= now {
                due.push(b.clone());
                false
            } else {
                true
            }
        });
        for burial in due {
            if let Some(task) = self.active.remove(&burial.id) {
                events.push(self.bury(task, BurialCause::Expired, now));
            }
        }

        // Newly lapsed tasks enter the settle window.
        let settle = Duration::milliseconds(self.settings.settle_delay_ms as i64);
        for id in self.active.lapsed(now) {
            if !self.is_expiring(&id) {
                self.pending.push(PendingBurial {
                    id: id.clone(),
                    due: now + settle,
                });
                events.push(Event::TaskExpiring { id, at: now });
            }
        }

        // Retention sweep. Eviction beats a hold due in the same tick.
        for entry in self.graveyard.sweep(now) {
            self.holds.invalidate(&entry.id);
            events.push(Event::GraveEvicted {
                id: entry.id,
                at: now,
            });
        }

        // Due holds resurrect whatever still exists; stale timers drop.
        for id in self.holds.take_due(now) {
            if let Some(entry) = self.graveyard.remove(&id) {
                let task = Task::resurrected(&entry, now);
                self.active.add(task.clone());
                events.push(Event::GraveResurrected {
                    grave_id: entry.id,
                    task,
                    at: now,
                });
            }
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn bury(&mut self, task: Task, cause: BurialCause, at: DateTime<Utc>) -> Event {
        let entry = GraveEntry::bury(task, at);
        self.graveyard.insert(entry.clone());
        self.counters.record_expiration();
        Event::TaskBuried { entry, cause, at }
    }
}
