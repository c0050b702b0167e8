//! `SQLite` table definitions.
//!
//! Storage mirrors a browser's local storage: a flat table of string keys
//! mapped to JSON-encoded string values.

/// Bookkeeping table; holds `schema_version`. Created before any migration runs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// The key/value items table.
pub const CREATE_ITEMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS items (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_table_is_keyed() {
        assert!(CREATE_ITEMS_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_ITEMS_TABLE.contains("value TEXT NOT NULL"));
    }

    #[test]
    fn test_statements_are_idempotent() {
        for stmt in [CREATE_METADATA_TABLE, CREATE_ITEMS_TABLE] {
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }
}
