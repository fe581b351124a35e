use chrono::{Duration, Utc};
use clap::Subcommand;
use lastcall_core::storage::Config;
use lastcall_core::Database;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task with a deadline
    Add {
        /// Task name (free text, trimmed and capped at 200 characters)
        name: String,
        /// Minutes until the deadline
        #[arg(long)]
        minutes: Option<u64>,
        /// Use a configured quick preset instead of --minutes
        #[arg(long, conflicts_with = "minutes")]
        preset: Option<String>,
    },
    /// List active tasks ordered by remaining time, with urgency
    List,
    /// Complete a task
    Complete {
        id: String,
    },
    /// Delete a task (it moves to the graveyard and the streak resets)
    Delete {
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut db = Database::open()?;
    let mut engine = super::load_engine(&db, &config)?;
    let now = Utc::now();

    match action {
        TaskAction::Add {
            name,
            minutes,
            preset,
        } => {
            let duration = match (minutes, preset) {
                (Some(m), _) => Duration::minutes(m as i64),
                (None, Some(p)) => config
                    .preset_duration(&p)
                    .ok_or_else(|| format!("unknown preset: {p}"))?,
                (None, None) => config.default_duration(),
            };
            let event = engine.create(&name, duration, now)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        TaskAction::List => {
            let snapshot = engine.snapshot(now);
            println!("{}", serde_json::to_string_pretty(&snapshot.tasks)?);
        }
        TaskAction::Complete { id } => match engine.complete(&id, now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::json!({ "type": "not_found", "id": id })),
        },
        TaskAction::Delete { id } => match engine.delete(&id, now) {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::json!({ "type": "not_found", "id": id })),
        },
    }

    super::save_engine(&mut db, &engine);
    Ok(())
}
