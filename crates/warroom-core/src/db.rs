// SQLite persistence for squad state.

use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// String key-value persistence used to save and restore the squad.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` if nothing has been saved.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed key-value store.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS squad_state (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database mutex poisoned"))
    }

    /// When `key` was last written, as stored by SQLite.
    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT updated_at FROM squad_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("failed to query state timestamp")
    }
}

impl KeyValueStore for Database {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM squad_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .context("failed to load state")
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO squad_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![key, value],
        )
        .context("failed to save state")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open(":memory:").expect("in-memory database should open")
    }

    #[test]
    fn open_creates_table() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert!(tables.contains(&"squad_state".to_string()));
    }

    #[test]
    fn save_and_load_round_trip() {
        let db = test_db();
        db.save("iplSquad", r#"{"players":[]}"#).unwrap();
        assert_eq!(db.load("iplSquad").unwrap().as_deref(), Some(r#"{"players":[]}"#));
    }

    #[test]
    fn load_returns_none_for_missing_key() {
        let db = test_db();
        assert!(db.load("nonexistent").unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let db = test_db();
        db.save("key", "1").unwrap();
        db.save("key", "2").unwrap();
        assert_eq!(db.load("key").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn save_stamps_updated_at() {
        let db = test_db();
        assert!(db.updated_at("key").unwrap().is_none());
        db.save("key", "v").unwrap();
        let stamp = db.updated_at("key").unwrap().unwrap();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("warroom.db");
        let path = path.to_str().unwrap();
        {
            let db = Database::open(path).unwrap();
            db.save("iplSquad", "saved").unwrap();
        }
        let db = Database::open(path).unwrap();
        assert_eq!(db.load("iplSquad").unwrap().as_deref(), Some("saved"));
    }
}
