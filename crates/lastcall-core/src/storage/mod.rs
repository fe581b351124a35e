mod config;
pub mod database;

pub use config::{Config, EngineConfig};
pub use database::{Database, LoadedState};

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `LASTCALL_DATA_DIR` overrides the location wholesale (tests point it at
/// a temp dir). Otherwise `~/.config/lastcall`, or `~/.config/lastcall-dev`
/// when `LASTCALL_ENV=dev`.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var("LASTCALL_DATA_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("LASTCALL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base.join("lastcall-dev")
            } else {
                base.join("lastcall")
            }
        }
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
