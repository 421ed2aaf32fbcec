//! Key-value persistence for catalog, cart and wallet.
//!
//! Values are plain strings (JSON arrays for catalog and cart, a decimal string
//! for the wallet). `SqliteStore` keeps them in a single table and writes
//! batches inside one transaction, so a checkout never leaves the wallet
//! debited with the cart still stored.

use crate::error::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key holding the imported site listing
pub const CATALOG_KEY: &str = "site_listings_v1";
/// Key holding the cart
pub const CART_KEY: &str = "site_cart_v1";
/// Key holding the wallet balance
pub const WALLET_KEY: &str = "wallet_balance_v1";

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One write inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StoreWrite {
    pub fn set(key: &str, value: impl Into<String>) -> Self {
        StoreWrite::Set {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn remove(key: &str) -> Self {
        StoreWrite::Remove {
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            StoreWrite::Set { key, .. } | StoreWrite::Remove { key } => key,
        }
    }
}

/// String key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Applies a batch of writes in order.
    ///
    /// The default runs the writes one by one. Stores that can do better
    /// override this so the batch lands completely or not at all.
    fn apply(&mut self, writes: &[StoreWrite]) -> StoreResult<()> {
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => self.set(key, value)?,
                StoreWrite::Remove { key } => self.remove(key)?,
            }
        }
        Ok(())
    }
}

/// Returns the default database path: ~/.local/share/site_market/market.db
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("site_market")
        .join("market.db")
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and initialises the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Failed to create {}: {}", parent.display(), e);
                }
            }
        }
        log::info!("Market DB: {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Number of keys currently stored
    pub fn len(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Creates the `kv_store` table if it does not already exist.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key        TEXT NOT NULL PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
}

fn write_one(conn: &Connection, write: &StoreWrite) -> rusqlite::Result<()> {
    match write {
        StoreWrite::Set { key, value } => {
            conn.execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET
                    value      = excluded.value,
                    updated_at = excluded.updated_at",
                params![key, value],
            )?;
        }
        StoreWrite::Remove { key } => {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        }
    }
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        write_one(&self.conn, &StoreWrite::set(key, value))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        write_one(&self.conn, &StoreWrite::remove(key))?;
        Ok(())
    }

    fn apply(&mut self, writes: &[StoreWrite]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        for write in writes {
            write_one(&tx, write)?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// In-memory store, mainly for tests
///
/// `fail_writes_to` makes every write touching that key fail, and a batch
/// containing such a write is rejected before anything is written.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    failing_key: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_to(&mut self, key: &str) {
        self.failing_key = Some(key.to_string());
    }

    pub fn clear_failures(&mut self) {
        self.failing_key = None;
    }

    fn check_writable(&self, key: &str) -> StoreResult<()> {
        if self.failing_key.as_deref() == Some(key) {
            return Err(StoreError::WriteRejected(key.to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        self.entries.remove(key);
        Ok(())
    }

    fn apply(&mut self, writes: &[StoreWrite]) -> StoreResult<()> {
        for write in writes {
            self.check_writable(write.key())?;
        }
        for write in writes {
            match write {
                StoreWrite::Set { key, value } => {
                    self.entries.insert(key.clone(), value.clone());
                }
                StoreWrite::Remove { key } => {
                    self.entries.remove(key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
