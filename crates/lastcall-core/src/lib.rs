//! # Lastcall Core Library
//!
//! Core engine for Lastcall, a local-first manager for short-lived,
//! deadline-bound tasks. Tasks are irrevocably removed from the active set
//! the moment their deadline passes, held in a 24-hour recovery store (the
//! graveyard), and can be resurrected as brand-new tasks that keep their
//! original relative duration.
//!
//! ## Architecture
//!
//! - **Lifecycle Engine**: a wall-clock-based state machine that requires
//!   the caller to invoke `tick()` periodically (once per second in the
//!   reference driver) and to pass the sampled time into every operation,
//!   so tests can simulate time without real delays
//! - **Storage**: SQLite-based state persistence and TOML-based
//!   configuration; persistence is best-effort and never crashes the engine
//! - **Events**: every state change surfaces as exactly one serializable
//!   event the UI collaborator consumes
//!
//! ## Key Components
//!
//! - [`LifecycleEngine`]: the active store, graveyard, counters, and the
//!   deferred operations (settle delays and hold-to-resurrect timers)
//! - [`classify`]: pure urgency classification of a deadline
//! - [`Database`]: engine state persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod lifecycle;
pub mod stats;
pub mod storage;
pub mod task;
pub mod urgency;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{BurialCause, Event};
pub use lifecycle::{
    ActiveStore, DeferredState, EngineSettings, GraveyardStore, HoldTracker, LifecycleEngine,
    Snapshot,
};
pub use stats::Counters;
pub use storage::{Config, Database};
pub use task::{GraveEntry, Task};
pub use urgency::{classify, Urgency};
