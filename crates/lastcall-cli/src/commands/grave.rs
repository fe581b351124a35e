use chrono::Utc;
use clap::Subcommand;
use lastcall_core::storage::Config;
use lastcall_core::Database;

#[derive(Subcommand)]
pub enum GraveAction {
    /// List grave entries with remaining retention
    List,
    /// Begin the hold-to-resurrect gesture; it fires after the configured
    /// hold duration, on a later tick
    Hold {
        id: String,
    },
    /// Release the gesture before it fires
    Release {
        id: String,
    },
    /// Permanently delete an entry, bypassing retention
    Purge {
        id: String,
    },
}

pub fn run(action: GraveAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut db = Database::open()?;
    let mut engine = super::load_engine(&db, &config)?;
    let now = Utc::now();

    match action {
        GraveAction::List => {
            let snapshot = engine.snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot.graveyard)?);
        }
        GraveAction::Hold { id } => {
            if engine.begin_hold(&id, now) {
                println!("{}", serde_json::json!({ "type": "hold_started", "id": id }));
            } else {
                println!("{}", serde_json::json!({ "type": "not_found", "id": id }));
            }
        }
        GraveAction::Release { id } => {
            if engine.cancel_hold(&id) {
                println!("{}", serde_json::json!({ "type": "hold_released", "id": id }));
            } else {
                println!("{}", serde_json::json!({ "type": "not_found", "id": id }));
            }
        }
        GraveAction::Purge { id } => match engine.permanently_delete(&id, now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::json!({ "type": "not_found", "id": id })),
        },
    }

    super::save_engine(&mut db, &engine);
    Ok(())
}
