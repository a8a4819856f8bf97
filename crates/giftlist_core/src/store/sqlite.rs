//! SQLite-backed key-value store.

use super::{KeyValueStore, StoreResult};
use crate::db::{ensure_kv_schema, open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable store over the `kv_store` table.
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    /// Opens (or creates) the database file with the `kv_store` schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Adopts a caller-opened connection, creating the schema if it is missing.
    pub fn from_connection(mut conn: Connection) -> StoreResult<Self> {
        ensure_kv_schema(&mut conn)?;
        Ok(Self { conn })
    }

    /// Releases the underlying connection, e.g. for inspection or reuse.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl KeyValueStore for SqliteKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, blob: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, blob],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::store::KeyValueStore;

    #[test]
    fn set_overwrites_previous_value() {
        let mut store = SqliteKvStore::open_in_memory().unwrap();
        assert_eq!(store.get("people").unwrap(), None);

        store.set("people", "[]").unwrap();
        store.set("people", "[1]").unwrap();
        assert_eq!(store.get("people").unwrap().as_deref(), Some("[1]"));
    }
}
