//! SQLite persistence for the lifecycle engine.
//!
//! Tasks and grave entries are stored one row each, so a single corrupt
//! record never poisons a load: any row failing shape validation is dropped
//! and counted, never fatal. Counters and deferred-operation state live in
//! a kv table as JSON. Saving rewrites the tables in one transaction after
//! every mutation; a failed save leaves the in-memory engine authoritative.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::{CoreError, DatabaseError};
use crate::lifecycle::DeferredState;
use crate::stats::Counters;
use crate::task::{GraveEntry, Task};

use super::data_dir;

const COUNTERS_KEY: &str = "counters";
const DEFERRED_KEY: &str = "deferred";

/// Everything the engine needs to resume, plus the number of persisted
/// records that failed validation and were discarded.
#[derive(Debug, Default)]
pub struct LoadedState {
    pub tasks: Vec<Task>,
    pub graveyard: Vec<GraveEntry>,
    pub counters: Counters,
    pub deferred: DeferredState,
    pub discarded: usize,
}

/// SQLite database for engine state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/lastcall.db`, creating the file and
    /// schema if they don't exist.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("lastcall.db");
        let conn = Connection::open(&path)
            .map_err(|source| DatabaseError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|source| DatabaseError::OpenFailed {
                path: ":memory:".into(),
                source,
            })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id       TEXT PRIMARY KEY,
                    name     TEXT NOT NULL,
                    deadline TEXT NOT NULL,
                    created  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS graveyard (
                    id         TEXT PRIMARY KEY,
                    name       TEXT NOT NULL,
                    deadline   TEXT NOT NULL,
                    created    TEXT NOT NULL,
                    expired_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Load the full engine state, dropping malformed records per-row.
    pub fn load_state(&self) -> Result<LoadedState, DatabaseError> {
        let mut state = LoadedState::default();

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, deadline, created FROM tasks ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            match row.ok().and_then(|(id, name, deadline, created)| {
                Some(Task {
                    id,
                    name: non_empty(name)?,
                    deadline: parse_instant(&deadline)?,
                    created: parse_instant(&created)?,
                })
            }) {
                Some(task) => state.tasks.push(task),
                None => state.discarded += 1,
            }
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, name, deadline, created, expired_at FROM graveyard ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        for row in rows {
            match row
                .ok()
                .and_then(|(id, name, deadline, created, expired_at)| {
                    Some(GraveEntry {
                        id,
                        name: non_empty(name)?,
                        deadline: parse_instant(&deadline)?,
                        created: parse_instant(&created)?,
                        expired_at: parse_instant(&expired_at)?,
                    })
                }) {
                Some(entry) => state.graveyard.push(entry),
                None => state.discarded += 1,
            }
        }

        if let Some(json) = self.kv_get(COUNTERS_KEY)? {
            match serde_json::from_str(&json) {
                Ok(counters) => state.counters = counters,
                Err(_) => state.discarded += 1,
            }
        }
        if let Some(json) = self.kv_get(DEFERRED_KEY)? {
            match serde_json::from_str(&json) {
                Ok(deferred) => state.deferred = deferred,
                Err(_) => state.discarded += 1,
            }
        }

        Ok(state)
    }

    /// Rewrite the whole state in one transaction.
    pub fn save_state(
        &mut self,
        tasks: &[Task],
        graveyard: &[GraveEntry],
        counters: &Counters,
        deferred: &DeferredState,
    ) -> Result<(), DatabaseError> {
        let counters_json = serde_json::to_string(counters)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        let deferred_json = serde_json::to_string(deferred)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        for task in tasks {
            tx.execute(
                "INSERT INTO tasks (id, name, deadline, created) VALUES (?1, ?2, ?3, ?4)",
                params![
                    task.id,
                    task.name,
                    task.deadline.to_rfc3339(),
                    task.created.to_rfc3339(),
                ],
            )?;
        }
        tx.execute("DELETE FROM graveyard", [])?;
        for entry in graveyard {
            tx.execute(
                "INSERT INTO graveyard (id, name, deadline, created, expired_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.id,
                    entry.name,
                    entry.deadline.to_rfc3339(),
                    entry.created.to_rfc3339(),
                    entry.expired_at.to_rfc3339(),
                ],
            )?;
        }
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![COUNTERS_KEY, counters_json],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![DEFERRED_KEY, deferred_json],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_empty(name: String) -> Option<String> {
    if name.trim().is_empty() {
        None
    } else {
        Some(name)
    }
}
