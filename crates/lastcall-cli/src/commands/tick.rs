use chrono::Utc;
use lastcall_core::storage::Config;
use lastcall_core::Database;

/// One lifecycle tick at wall-clock now, printing the produced events.
pub fn run_once() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut db = Database::open()?;
    let mut engine = super::load_engine(&db, &config)?;
    let events = engine.tick(Utc::now());
    super::print_events(&events)?;
    super::save_engine(&mut db, &engine);
    Ok(())
}

/// Foreground tick driver: one tick per interval until interrupted.
///
/// State is reloaded each tick so mutations from other invocations are
/// picked up between ticks.
pub fn run_watch(interval_secs: u64) -> Result<(), Box<dyn std::error::Error>> {
    let interval = std::time::Duration::from_secs(interval_secs.max(1));
    loop {
        run_once()?;
        std::thread::sleep(interval);
    }
}
