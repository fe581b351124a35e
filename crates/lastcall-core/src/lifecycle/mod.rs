mod active;
mod engine;
mod graveyard;
mod hold;

pub use active::ActiveStore;
pub use engine::{
    DeferredState, EngineSettings, GraveView, LifecycleEngine, PendingBurial, Snapshot, TaskView,
};
pub use graveyard::{remaining_retention_ms, GraveyardStore, RETENTION_HOURS};
pub use hold::HoldTracker;
