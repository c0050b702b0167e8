//! Key/value storage for notaryos.
//!
//! [`LocalStorage`] plays the role a browser's `localStorage` plays for a web
//! client: string keys mapped to JSON-encoded string values, persisted in a
//! single `SQLite` file. Higher layers ([`crate::records`], [`crate::session`])
//! decide what the strings mean.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, trace};

use crate::error::{Error, Result};

/// Path reported for in-memory storage.
const IN_MEMORY_PATH: &str = ":memory:";

/// Durable string key/value store.
///
/// The connection sits behind a mutex so a single `LocalStorage` can be
/// shared through an `Arc` by the record store and the session manager.
#[derive(Debug)]
pub struct LocalStorage {
    /// Path to the storage file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl LocalStorage {
    /// Open or create a storage file at the given path.
    ///
    /// Creates the parent directories and the file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening storage at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::StorageOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Storage opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory storage instance, discarded on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::StorageOpen {
            path: PathBuf::from(IN_MEMORY_PATH),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(IN_MEMORY_PATH),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the storage file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .lock()?
            .query_row("SELECT value FROM items WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        trace!(key, found = value.is_some(), "get_item");
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.execute(
            r"
            INSERT INTO items (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value],
        )?;
        trace!(key, bytes = value.len(), "set_item");
        Ok(())
    }

    /// Remove `key`. Returns `true` if something was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let affected = self
            .lock()?
            .execute("DELETE FROM items WHERE key = ?1", [key])?;
        trace!(key, removed = affected > 0, "remove_item");
        Ok(affected > 0)
    }

    /// List all stored keys in lexical order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key FROM items ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Remove every key. Returns the number of keys removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.lock()?.execute("DELETE FROM items", [])?;
        if affected > 0 {
            info!("Cleared {} storage keys", affected);
        }
        Ok(affected)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::internal("storage connection lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> LocalStorage {
        LocalStorage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_get_missing_key() {
        let storage = create_test_storage();
        assert_eq!(storage.get_item("nope").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let storage = create_test_storage();
        storage.set_item("notary_user", r#"{"email":"a@b.com"}"#).unwrap();

        assert_eq!(
            storage.get_item("notary_user").unwrap().as_deref(),
            Some(r#"{"email":"a@b.com"}"#)
        );
    }

    #[test]
    fn test_set_overwrites() {
        let storage = create_test_storage();
        storage.set_item("k", "1").unwrap();
        storage.set_item("k", "2").unwrap();

        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn test_remove_item() {
        let storage = create_test_storage();
        storage.set_item("k", "v").unwrap();

        assert!(storage.remove_item("k").unwrap());
        assert!(!storage.remove_item("k").unwrap());
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_keys_sorted() {
        let storage = create_test_storage();
        storage.set_item("b", "[]").unwrap();
        storage.set_item("a", "[]").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_clear() {
        let storage = create_test_storage();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        assert_eq!(storage.clear().unwrap(), 2);
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_unicode_value() {
        let storage = create_test_storage();
        storage.set_item("k", "Núñez • 公証").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("Núñez • 公証"));
    }

    #[test]
    fn test_open_file_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        {
            let storage = LocalStorage::open(&path).unwrap();
            storage.set_item("notary_appointments", "[]").unwrap();
        }

        let storage = LocalStorage::open(&path).unwrap();
        assert_eq!(storage.path(), path.as_path());
        assert_eq!(
            storage.get_item("notary_appointments").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("storage.db");

        let storage = LocalStorage::open(&nested);
        assert!(storage.is_ok());
        assert!(nested.exists());
    }
}
