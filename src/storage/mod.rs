//! Persistence for the scan history.
//!
//! The history is one JSON document stored under a single key of an opaque
//! string key-value store, the same shape the app has always written. Every
//! save replaces the whole list.

pub mod keyed;
pub mod memory;
pub mod sqlite;

pub use keyed::KeyedScanStorage;
pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use thiserror::Error;

use crate::models::ScanRecord;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Stored history is malformed: {0}")]
    Malformed(String),

    #[error("Internal lock error")]
    LockPoisoned,

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },
}

/// String-keyed string store, the device's opaque get/set-by-key storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces any existing value atomically.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load/save contract the history store depends on.
pub trait ScanStorage: Send + Sync {
    /// The persisted list; empty when nothing has been saved yet.
    fn load(&self) -> Result<Vec<ScanRecord>, StorageError>;

    /// Replaces the persisted list with `records`.
    fn save(&self, records: &[ScanRecord]) -> Result<(), StorageError>;
}
