//! Calculator history storage using SQLite.
//!
//! A single append-only table of evaluated expressions. Entries are never
//! updated or deleted individually; the only removal is a full clear.

use anyhow::Result;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A single evaluated expression in the history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Auto-assigned, unique, increasing with insertion order
    pub id: i64,
    /// Expression text as it was displayed, e.g. `12 + 30`
    pub expression: String,
    /// Result text, e.g. `42`
    pub result: String,
    /// When the expression was evaluated
    pub created_at: DateTime<Local>,
}

/// Handle to the history database.
///
/// Each handle owns its own connection; concurrent handles on the same file
/// rely on SQLite's own locking.
pub struct HistoryStore {
    connection: Connection,
}

impl HistoryStore {
    /// Opens (creating if needed) the history database at `database_path`.
    ///
    /// # Errors
    /// - If the database file cannot be opened
    /// - If table creation fails
    pub fn open(database_path: &Path) -> Result<Self> {
        let connection = Connection::open(database_path)?;
        Self::init(connection)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(connection: Connection) -> Result<Self> {
        // Tasks each open their own connection and may overlap.
        connection.busy_timeout(BUSY_TIMEOUT)?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                expression TEXT NOT NULL,
                result TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self { connection })
    }

    /// Appends an entry and returns its id.
    ///
    /// # Errors
    /// - If insertion fails
    pub fn insert(&self, expression: &str, result: &str) -> Result<i64> {
        let timestamp = Local::now().to_rfc3339();

        self.connection.execute(
            "INSERT INTO history (expression, result, created_at) VALUES (?1, ?2, ?3)",
            params![expression, result, timestamp],
        )?;

        let id = self.connection.last_insert_rowid();
        tracing::debug!("History entry {} saved: {} = {}", id, expression, result);
        Ok(id)
    }

    /// Returns every entry in insertion order (oldest first).
    ///
    /// # Errors
    /// - If query execution fails
    /// - If a stored timestamp cannot be parsed
    pub fn get_all(&self) -> Result<Vec<HistoryEntry>> {
        let mut statement = self
            .connection
            .prepare("SELECT id, expression, result, created_at FROM history ORDER BY id ASC")?;

        let entries = statement
            .query_map([], |row| {
                let timestamp_str = row.get::<_, String>(3)?;
                let created_at = DateTime::parse_from_rfc3339(&timestamp_str)
                    .map(|dt| dt.with_timezone(&Local))
                    .map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;

                Ok(HistoryEntry {
                    id: row.get(0)?,
                    expression: row.get(1)?,
                    result: row.get(2)?,
                    created_at,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Removes every entry and returns how many were removed.
    ///
    /// # Errors
    /// - If deletion fails
    pub fn delete_all(&self) -> Result<usize> {
        let removed = self.connection.execute("DELETE FROM history", [])?;
        tracing::debug!("History cleared ({} entries)", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_all_returns_insertion_order() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.insert("1 + 1", "2").unwrap();
        store.insert("9 * 9", "81").unwrap();
        store.insert("7 % 4", "3").unwrap();

        let entries = store.get_all().unwrap();
        let expressions: Vec<_> = entries.iter().map(|e| e.expression.as_str()).collect();

        assert_eq!(expressions, ["1 + 1", "9 * 9", "7 % 4"]);
        assert_eq!(entries[1].result, "81");
        assert!(entries[0].id < entries[1].id && entries[1].id < entries[2].id);
    }

    #[test]
    fn delete_all_empties_the_table() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.insert("1 + 1", "2").unwrap();
        store.insert("2 + 2", "4").unwrap();

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let store = HistoryStore::open_in_memory().unwrap();
        let first = store.insert("1 + 1", "2").unwrap();
        store.delete_all().unwrap();
        let second = store.insert("1 + 1", "2").unwrap();

        assert!(second > first);
    }

    #[test]
    fn entries_persist_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");

        HistoryStore::open(&path)
            .unwrap()
            .insert("123 - 23", "100")
            .unwrap();

        let entries = HistoryStore::open(&path).unwrap().get_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expression, "123 - 23");
        assert_eq!(entries[0].result, "100");
    }
}
