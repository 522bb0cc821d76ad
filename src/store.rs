//! Snapshot persistence over SQLite
//!
//! A single-row key-value store: the full input set plus topology choice is
//! serialized to JSON and kept under a fixed key. Failures here are never
//! fatal to the planner; callers fall back to defaults on read problems and
//! continue unsaved on write problems.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

use crate::models::Snapshot;

const SNAPSHOT_KEY: &str = "default";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot storage unavailable: {0}")]
    Unavailable(#[from] rusqlite::Error),
    #[error("stored snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored snapshot is incomplete: missing domain or environment entries")]
    Incomplete,
}

impl StoreError {
    /// Malformed snapshots are treated as "no snapshot", not as failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, StoreError::Malformed(_) | StoreError::Incomplete)
    }
}

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(SnapshotStore { conn })
    }

    /// Loads the last saved snapshot, or `None` when nothing has been saved.
    ///
    /// A payload that fails to parse, or parses into an input set missing
    /// any domain or environment entry, comes back as a malformed error the
    /// caller downgrades to "no snapshot".
    pub fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1",
                [SNAPSHOT_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let snapshot: Snapshot = serde_json::from_str(&payload)?;
        if !snapshot.inputs.is_complete() {
            return Err(StoreError::Incomplete);
        }
        Ok(Some(snapshot))
    }

    /// Persists the snapshot, replacing any previous one.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let payload = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO snapshots (key, payload, saved_at) VALUES (?1, ?2, ?3)",
            (SNAPSHOT_KEY, &payload, snapshot.saved_at.to_rfc3339()),
        )?;
        Ok(())
    }

    /// Discards the saved snapshot, if any.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM snapshots WHERE key = ?1", [SNAPSHOT_KEY])?;
        Ok(())
    }
}
