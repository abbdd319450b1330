// 💾 Durable Document Store - get/set/remove strings by key
//
// The session store only ever sees this trait, so the backend can be an
// in-memory map (tests), SQLite (terminal app) or anything else that stores
// one string per key.

use crate::error::StorageError;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

pub trait DocumentStore {
    /// Read a document; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a document, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a document; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Map-backed store; writes can be switched to fail for testing recovery
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    failed_reads_left: Cell<usize>,
    write_count: Cell<usize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one document
    pub fn with_document(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .documents
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Make the next `count` calls to `get` fail
    pub fn fail_next_reads(&self, count: usize) {
        self.failed_reads_left.set(count);
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.write_count.get()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.documents.borrow().contains_key(key)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let failed_reads_left = self.failed_reads_left.get();
        if failed_reads_left > 0 {
            self.failed_reads_left.set(failed_reads_left - 1);
            return Err(StorageError::Unavailable("database is locked".to_string()));
        }
        Ok(self.documents.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        self.documents
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.write_count.set(self.write_count.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }
        self.documents.borrow_mut().remove(key);
        Ok(())
    }
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// Key-value documents in a single SQLite table
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        setup_documents_table(&conn)?;
        Ok(SqliteDocumentStore { conn })
    }

    /// When the document was last written
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        let stamp: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(stamp
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|t| t.with_timezone(&Utc)))
    }
}

fn setup_documents_table(conn: &Connection) -> Result<(), StorageError> {
    // WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl DocumentStore for SqliteDocumentStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO documents (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM documents WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_store_round_trip() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();

        assert_eq!(store.get("state").unwrap(), None);

        store.set("state", "{\"a\":1}").unwrap();
        store.set("state", "{\"a\":2}").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(store.updated_at("state").unwrap().is_some());

        store.remove("state").unwrap();
        store.remove("state").unwrap();
        assert_eq!(store.get("state").unwrap(), None);
        assert_eq!(store.updated_at("state").unwrap(), None);
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let conn = Connection::open_in_memory().unwrap();
        setup_documents_table(&conn).unwrap();
        setup_documents_table(&conn).unwrap();

        let store = SqliteDocumentStore::from_connection(conn).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store_failing_writes() {
        let store = MemoryDocumentStore::with_document("k", "old");
        store.set_fail_writes(true);

        assert!(store.set("k", "new").is_err());
        assert!(store.remove("k").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));
        assert_eq!(store.write_count(), 0);

        store.set_fail_writes(false);
        store.set("k", "new").unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_memory_store_failing_reads_recover() {
        let store = MemoryDocumentStore::with_document("k", "saved");
        store.fail_next_reads(1);

        assert!(store.get("k").is_err());
        assert_eq!(store.get("k").unwrap().as_deref(), Some("saved"));
    }
}
