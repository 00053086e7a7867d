use chrono::Local;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::sequence::Mode;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage key for the best time of a (size, mode) pair
pub fn best_key(size: usize, mode: Mode) -> String {
    format!("schulte_best_{}_{}", size, mode.key())
}

/// A completed time replaces the record only when strictly faster.
pub fn improves(previous: Option<u64>, candidate: u64) -> bool {
    previous.map_or(true, |best| candidate < best)
}

/// String key-value persistence, one value per key
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store that survives across sessions
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS best_times (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(SqliteStore { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM best_times WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO best_times (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Process-local store used when the database cannot be opened
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Personal bests per (size, mode) on top of a key-value store
pub struct BestTimes {
    store: Box<dyn KeyValueStore>,
}

impl BestTimes {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Stored best in milliseconds. Unreadable or corrupt values count as no record.
    pub fn get(&self, size: usize, mode: Mode) -> Option<u64> {
        let key = best_key(size, mode);
        match self.store.get_item(&key) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    warn!("ignoring corrupt best time {raw:?} for {key}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("failed to read {key}: {e}");
                None
            }
        }
    }

    /// Stores `ms` if it beats the current record. Returns whether it did.
    pub fn record(&mut self, size: usize, mode: Mode, ms: u64) -> Result<bool, StoreError> {
        if !improves(self.get(size, mode), ms) {
            return Ok(false);
        }
        self.store.set_item(&best_key(size, mode), &ms.to_string())?;
        Ok(true)
    }
}

impl std::fmt::Debug for BestTimes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestTimes").finish_non_exhaustive()
    }
}
