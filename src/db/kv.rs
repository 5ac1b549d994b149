//! Async key-value persistence over a single SQLite `kv` table.
//!
//! The storage contract is deliberately schemaless: opaque string keys mapped
//! to arbitrary JSON values. The domain repository decides what goes under
//! each key; this layer only guarantees durability and atomicity per
//! operation. Absence of a key is a normal result, never an error.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::{sqlite, StoreError};

/// Handle to the embedded store. Each operation acquires the connection,
/// runs inside its own transaction, and commits before returning.
pub struct KvStore {
    conn: Mutex<Connection>,
}

impl KvStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(sqlite::open_database(path)?),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(sqlite::open_memory_database()?),
        })
    }

    /// Read a single key. `Ok(None)` when the key was never written.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let raw: Option<String> = tx
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        tx.commit()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Write a single key (upsert).
    pub async fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)?;
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, text],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a single key. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        tx.commit()?;
        Ok(())
    }

    /// Read every stored key and its value.
    pub async fn dump_all(&self) -> Result<Map<String, Value>, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let mut out = Map::new();
        {
            let mut stmt = tx.prepare("SELECT key, value FROM kv ORDER BY key")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (key, text) = row?;
                out.insert(key, serde_json::from_str(&text)?);
            }
        }
        tx.commit()?;
        Ok(out)
    }

    /// Remove every stored key. Irreversible.
    pub async fn clear_all(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM kv", [])?;
        tx.commit()?;
        Ok(())
    }
}
