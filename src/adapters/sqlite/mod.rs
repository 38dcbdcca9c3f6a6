//! SQLite adapter: Implementation of the record store.
//!
//! Provides local persistence for prediction records.
//!
//! # Mutex Behavior
//!
//! The database connection is protected by `Mutex`, which also serializes
//! writes so sequential `set` calls land in call order. A poisoned mutex
//! (from panic in another thread) will cause panic. This fail-fast behavior
//! is intentional for data integrity in health applications.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use crate::ports::{RecordStore, StoredRecord};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// SQLite record store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store backed by the given database file.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    ///
    /// # Errors
    /// Returns error if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().expect("Lock failed");

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,
                inserted_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }
}

impl RecordStore for SqliteStore {
    type Error = StorageError;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");
        let now = chrono::Utc::now().to_rfc3339();

        // REPLACE resolves a key collision by overwrite.
        conn.execute(
            "INSERT OR REPLACE INTO records (key, value, inserted_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )?;

        tracing::debug!("Saved record {key}");
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<StoredRecord>, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");

        let mut stmt = conn.prepare("SELECT key, value FROM records")?;
        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    key: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn delete_all(&self) -> Result<(), Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");
        conn.execute("DELETE FROM records", [])?;
        tracing::info!("Cleared all records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_all() {
        let store = SqliteStore::in_memory().expect("Should create db");

        store.set("1", b"first").expect("Should save");
        store.set("2", b"second").expect("Should save");

        let records = store.get_all().expect("Should read");
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .any(|r| r.key == "1" && r.value == b"first".to_vec()));
    }

    #[test]
    fn test_replace_on_same_key() {
        let store = SqliteStore::in_memory().expect("Should create db");

        store.set("1", b"old").expect("Should save");
        store.set("1", b"new").expect("Should save");

        let records = store.get_all().expect("Should read");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, b"new".to_vec());
    }

    #[test]
    fn test_delete_all() {
        let store = SqliteStore::in_memory().expect("Should create db");

        store.set("1", b"x").expect("Should save");
        store.delete_all().expect("Should clear");

        assert!(store.get_all().expect("Should read").is_empty());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("glucora.db");

        {
            let store = SqliteStore::new(&path).expect("Should create db");
            store.set("1", b"durable").expect("Should save");
        }

        let reopened = SqliteStore::new(&path).expect("Should reopen db");
        let records = reopened.get_all().expect("Should read");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, b"durable".to_vec());
    }
}
