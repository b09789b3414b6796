use serde_json::Value;

use super::{KeyValueStore, ScanStorage, StorageError};
use crate::config::SCANS_STORAGE_KEY;
use crate::models::ScanRecord;

/// Stores the whole history as one JSON array under a single key.
pub struct KeyedScanStorage<K> {
    store: K,
    key: String,
}

impl<K: KeyValueStore> KeyedScanStorage<K> {
    /// Uses the app's standard history key.
    pub fn new(store: K) -> Self {
        Self::with_key(store, SCANS_STORAGE_KEY)
    }

    pub fn with_key(store: K, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn inner(&self) -> &K {
        &self.store
    }
}

impl<K: KeyValueStore> ScanStorage for KeyedScanStorage<K> {
    /// Elements that do not decode as a record (unknown severity, missing
    /// fields) are skipped. A payload that is not an array fails the load.
    fn load(&self) -> Result<Vec<ScanRecord>, StorageError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };

        let elements = match serde_json::from_str::<Value>(&raw)? {
            Value::Array(elements) => elements,
            other => {
                return Err(StorageError::Malformed(format!(
                    "expected an array under '{}', found {}",
                    self.key,
                    json_kind(&other)
                )))
            }
        };

        let mut records = Vec::with_capacity(elements.len());
        for (position, element) in elements.into_iter().enumerate() {
            match serde_json::from_value::<ScanRecord>(element) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(position, error = %e, "Skipping unreadable scan record");
                }
            }
        }

        Ok(records)
    }

    fn save(&self, records: &[ScanRecord]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(records)?;
        self.store.set(&self.key, &serialized)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
