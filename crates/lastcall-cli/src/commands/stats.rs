use chrono::Utc;
use lastcall_core::storage::Config;
use lastcall_core::Database;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let engine = super::load_engine(&db, &config)?;
    let snapshot = engine.snapshot(Utc::now());
    let stats = serde_json::json!({
        "completed": snapshot.counters.completed,
        "expired": snapshot.counters.expired,
        "streak": snapshot.counters.streak,
        "success_rate": snapshot.success_rate,
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
