// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable keyed collections.
//!
//! The [`Store`] trait is the only persistence seam the queue depends on.
//! Records are opaque JSON text keyed by `(collection, key)` and carry a
//! creation stamp that backs a secondary ordering index.
//!
//! Two implementations ship with the crate:
//!
//! - [`SqliteStore`] - crash-durable, one SQLite file
//! - [`MemoryStore`] - process-local, for tests and throwaway queues

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;

/// SQL schema for the record store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    collection TEXT NOT NULL,
    key TEXT NOT NULL,
    created_at INTEGER NOT NULL,   -- microseconds since Unix epoch
    data TEXT NOT NULL,
    PRIMARY KEY (collection, key)
);

CREATE INDEX IF NOT EXISTS idx_records_created ON records(collection, created_at);
"#;

/// A single stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Primary key within the collection.
    pub key: String,
    /// Creation stamp in microseconds since the Unix epoch.
    pub created_at: i64,
    /// Serialized record body.
    pub data: String,
}

/// A durable keyed store of named collections.
///
/// Implementations need no internal concurrency control beyond being
/// [`Send`]; callers serialize access.
pub trait Store: Send {
    /// Insert or replace a record.
    fn put(&self, collection: &str, record: &StoredRecord) -> Result<()>;

    /// Fetch a record by key.
    fn get(&self, collection: &str, key: &str) -> Result<Option<StoredRecord>>;

    /// Fetch every record in a collection. No ordering is promised.
    fn get_all(&self, collection: &str) -> Result<Vec<StoredRecord>>;

    /// Delete a record. Deleting a missing key is not an error.
    fn delete(&self, collection: &str, key: &str) -> Result<()>;

    /// Delete every record in a collection.
    fn clear(&self, collection: &str) -> Result<()>;

    /// Number of records in a collection.
    fn count(&self, collection: &str) -> Result<usize>;

    /// Write `record` into `to` and delete its key from `from` as one atomic
    /// step: after a crash the record is in exactly one of the two.
    fn move_record(&self, from: &str, to: &str, record: &StoredRecord) -> Result<()>;
}

impl<S: Store + Sync> Store for std::sync::Arc<S> {
    fn put(&self, collection: &str, record: &StoredRecord) -> Result<()> {
        (**self).put(collection, record)
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<StoredRecord>> {
        (**self).get(collection, key)
    }

    fn get_all(&self, collection: &str) -> Result<Vec<StoredRecord>> {
        (**self).get_all(collection)
    }

    fn delete(&self, collection: &str, key: &str) -> Result<()> {
        (**self).delete(collection, key)
    }

    fn clear(&self, collection: &str) -> Result<()> {
        (**self).clear(collection)
    }

    fn count(&self, collection: &str) -> Result<usize> {
        (**self).count(collection)
    }

    fn move_record(&self, from: &str, to: &str, record: &StoredRecord) -> Result<()> {
        (**self).move_record(from, to, record)
    }
}

/// Apply the schema. Safe to run any number of times, including from
/// several connections at once.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite-backed [`Store`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // FULL sync: an acknowledged write must survive power loss, not just a crash.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = FULL;
             PRAGMA busy_timeout = 5000;",
        )?;

        run_migrations(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(SqliteStore { conn })
    }
}

const UPSERT: &str = "INSERT INTO records (collection, key, created_at, data)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(collection, key) DO UPDATE SET
         created_at = excluded.created_at,
         data = excluded.data";

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        key: row.get(0)?,
        created_at: row.get(1)?,
        data: row.get(2)?,
    })
}

impl Store for SqliteStore {
    fn put(&self, collection: &str, record: &StoredRecord) -> Result<()> {
        self.conn.execute(
            UPSERT,
            params![collection, record.key, record.created_at, record.data],
        )?;
        Ok(())
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<StoredRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT key, created_at, data FROM records
                 WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn get_all(&self, collection: &str) -> Result<Vec<StoredRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, created_at, data FROM records
             WHERE collection = ?1
             ORDER BY created_at, key",
        )?;
        let records = stmt
            .query_map(params![collection], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn delete(&self, collection: &str, key: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND key = ?2",
            params![collection, key],
        )?;
        Ok(())
    }

    fn clear(&self, collection: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM records WHERE collection = ?1", params![collection])?;
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn move_record(&self, from: &str, to: &str, record: &StoredRecord) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(UPSERT, params![to, record.key, record.created_at, record.data])?;
        tx.execute(
            "DELETE FROM records WHERE collection = ?1 AND key = ?2",
            params![from, record.key],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// In-memory [`Store`]. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, BTreeMap<String, StoredRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut BTreeMap<String, BTreeMap<String, StoredRecord>>) -> T) -> T {
        let mut guard = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl Store for MemoryStore {
    fn put(&self, collection: &str, record: &StoredRecord) -> Result<()> {
        self.with(|c| {
            c.entry(collection.to_string())
                .or_default()
                .insert(record.key.clone(), record.clone());
        });
        Ok(())
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<StoredRecord>> {
        Ok(self.with(|c| c.get(collection).and_then(|records| records.get(key).cloned())))
    }

    fn get_all(&self, collection: &str) -> Result<Vec<StoredRecord>> {
        Ok(self.with(|c| {
            c.get(collection)
                .map(|records| records.values().cloned().collect())
                .unwrap_or_default()
        }))
    }

    fn delete(&self, collection: &str, key: &str) -> Result<()> {
        self.with(|c| {
            if let Some(records) = c.get_mut(collection) {
                records.remove(key);
            }
        });
        Ok(())
    }

    fn clear(&self, collection: &str) -> Result<()> {
        self.with(|c| c.remove(collection));
        Ok(())
    }

    fn count(&self, collection: &str) -> Result<usize> {
        Ok(self.with(|c| c.get(collection).map_or(0, BTreeMap::len)))
    }

    fn move_record(&self, from: &str, to: &str, record: &StoredRecord) -> Result<()> {
        self.with(|c| {
            if let Some(records) = c.get_mut(from) {
                records.remove(&record.key);
            }
            c.entry(to.to_string())
                .or_default()
                .insert(record.key.clone(), record.clone());
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
