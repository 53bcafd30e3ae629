//! SQLite-backed key-value persistence.
//!
//! One JSON document per aggregate under a namespaced key. There are no
//! transactions spanning keys: each engine serializes its entire
//! aggregate on every mutation, so a record is always internally
//! consistent. Missing or corrupt records fall back to the aggregate's
//! default value instead of failing.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::data_dir;
use crate::error::StoreError;

/// Record keys for the persisted aggregates.
pub mod keys {
    /// Logged-in user record, absent while logged out.
    pub const USER: &str = "user";
    /// The task board aggregate: tasks plus the id counter.
    pub const KANBAN: &str = "kanbanData";
    /// Per-day analytics counters.
    pub const ANALYTICS: &str = "analyticsStats";
    /// Display theme.
    pub const THEME: &str = "theme";
}

/// Flat key-to-JSON store over a SQLite `kv` table.
///
/// Get/set are synchronous; the file survives restarts and is scoped to
/// the per-user data directory.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/focusdeck/focusdeck.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("focusdeck.db");
        Self::open_at(&path)
    }

    pub(crate) fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub(crate) fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Raw JSON text under `key`, if present.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Write raw JSON text under `key`, replacing any prior value.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        debug!(key, "record written");
        Ok(())
    }

    /// Delete the record under `key`. Absent keys are fine.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Load the aggregate stored under `key`.
    ///
    /// A missing record yields the default value; a corrupt record is
    /// logged and also yields the default, never an error.
    pub fn load_or_default<T>(&self, key: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned + Default,
    {
        match self.get_raw(key)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(value),
                Err(err) => {
                    warn!(key, %err, "corrupt record, falling back to default");
                    Ok(T::default())
                }
            },
            None => Ok(T::default()),
        }
    }

    /// Serialize `value` and write it under `key`.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json)
    }
}
