//! Schema versioning for the storage file.
//!
//! Migrations are listed in [`MIGRATIONS`] and applied in ascending order.
//! Each one runs in its own transaction together with its version bump, so
//! a failed step leaves the file at the previous version.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::schema::{CREATE_ITEMS_TABLE, CREATE_METADATA_TABLE};

/// Metadata key holding the applied version.
const VERSION_KEY: &str = "schema_version";

/// One schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version the file is at once this step has run.
    pub version: i32,
    /// Short description for logs.
    pub name: &'static str,
    /// SQL batch to execute.
    pub sql: &'static str,
}

/// Every migration, oldest first.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "key/value items",
    sql: CREATE_ITEMS_TABLE,
}];

/// The version a fully migrated file is at.
pub const CURRENT_VERSION: i32 = MIGRATIONS[MIGRATIONS.len() - 1].version;

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// Safe to call on every open.
///
/// # Errors
///
/// Returns an error if the file was written by a newer version, if the
/// stored version is unreadable, or if a migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_METADATA_TABLE)?;

    let stored = stored_version(conn)?;
    if stored > CURRENT_VERSION {
        return Err(Error::StorageMigration {
            message: format!(
                "storage schema version {stored} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > stored) {
        apply(conn, migration)?;
    }
    if stored < CURRENT_VERSION {
        info!(from = stored, to = CURRENT_VERSION, "storage schema migrated");
    }
    Ok(())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    debug!(version = migration.version, name = migration.name, "applying migration");
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)
        .map_err(|e| Error::StorageMigration {
            message: format!(
                "migration {} ({}) failed: {e}",
                migration.version, migration.name
            ),
        })?;
    tx.execute(
        "INSERT INTO metadata (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (VERSION_KEY, migration.version.to_string()),
    )?;
    tx.commit()?;
    Ok(())
}

/// Applied version; 0 for a fresh file.
fn stored_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    value.map_or(Ok(0), |v| {
        v.parse().map_err(|_| Error::StorageMigration {
            message: format!("stored schema version '{v}' is not a number"),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i32>(0),
        )
        .unwrap()
            == 1
    }

    fn set_version(conn: &Connection, value: &str) {
        conn.execute(
            "UPDATE metadata SET value = ?1 WHERE key = ?2",
            [value, VERSION_KEY],
        )
        .unwrap();
    }

    #[test]
    fn test_migrations_ascend() {
        assert!(MIGRATIONS.windows(2).all(|w| w[0].version < w[1].version));
        assert_eq!(MIGRATIONS[0].version, 1);
    }

    #[test]
    fn test_fresh_file_is_fully_migrated() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        assert!(table_exists(&conn, "items"));
        assert!(table_exists(&conn, "metadata"));
        assert_eq!(stored_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute("INSERT INTO items (key, value) VALUES ('k', '[]')", [])
            .unwrap();

        initialize_schema(&conn).unwrap();
        let value: String = conn
            .query_row("SELECT value FROM items WHERE key = 'k'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "[]");
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        set_version(&conn, &(CURRENT_VERSION + 1).to_string());

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }

    #[test]
    fn test_garbled_version_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        set_version(&conn, "abc");

        let err = initialize_schema(&conn).unwrap_err();
        assert!(err.to_string().contains("'abc' is not a number"));
    }

    #[test]
    fn test_failed_migration_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let broken = Migration {
            version: CURRENT_VERSION + 1,
            name: "broken",
            sql: "CREATE TABLE extra (id INTEGER); THIS IS NOT SQL;",
        };
        let err = apply(&conn, &broken).unwrap_err();

        assert!(matches!(err, Error::StorageMigration { .. }));
        assert!(!table_exists(&conn, "extra"));
        assert_eq!(stored_version(&conn).unwrap(), CURRENT_VERSION);
    }
}
