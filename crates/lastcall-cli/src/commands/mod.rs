pub mod config;
pub mod grave;
pub mod stats;
pub mod task;
pub mod tick;

use lastcall_core::storage::Config;
use lastcall_core::{Database, Event, LifecycleEngine, Task};

/// Load the engine for one CLI invocation, warning when persisted records
/// had to be discarded.
fn load_engine(db: &Database, config: &Config) -> Result<LifecycleEngine, Box<dyn std::error::Error>> {
    let state = db.load_state()?;
    if state.discarded > 0 {
        eprintln!(
            "warning: dropped {} malformed record(s) from saved state",
            state.discarded
        );
    }
    Ok(LifecycleEngine::restore(
        config.engine_settings(),
        state.tasks,
        state.graveyard,
        state.counters,
        state.deferred,
    ))
}

/// Best-effort save: a persistence failure is reported, never fatal -- the
/// in-memory state stays authoritative for this invocation.
fn save_engine(db: &mut Database, engine: &LifecycleEngine) {
    let tasks: Vec<Task> = engine.active().iter().cloned().collect();
    let graveyard: Vec<_> = engine.graveyard().iter().cloned().collect();
    if let Err(e) = db.save_state(
        &tasks,
        &graveyard,
        engine.counters(),
        &engine.deferred_state(),
    ) {
        eprintln!("warning: failed to save state: {e}");
    }
}

/// Print events one JSON object per line.
fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
