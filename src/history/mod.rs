//! Scan history store.
//!
//! `ScanHistory` owns the authoritative record list and the statistics
//! derived from it. Mutations are admitted one at a time through an async
//! gate and each one runs read, modify, persist, recompute to completion
//! before the next starts. The committed state is replaced only after the
//! storage write succeeds, so a failed write leaves memory and storage as
//! they were. The write and the commit run on one blocking task that holds
//! the gate, so a caller that stops waiting (a timeout, a dropped future)
//! cannot leave storage ahead of memory.
//!
//! Readers never wait on a mutation: they see the last committed state.

pub mod deps;
pub mod mock;

pub use deps::{Clock, IdGenerator, SystemClock, UuidGenerator};

use std::sync::{Arc, RwLock, RwLockReadGuard};

use tokio::sync::{Mutex, OwnedMutexGuard};

use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::models::{most_recent, ScanDraft, ScanRecord, ScanStats};
use crate::stats::calculate_stats;
use crate::storage::{KeyedScanStorage, ScanStorage, SqliteKeyValueStore, StorageError};

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Scan history is not initialized")]
    NotReady,
    #[error("Invalid scan: {0}")]
    InvalidDraft(String),
    #[error("Generated id {0} is already in use")]
    DuplicateId(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Storage task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryStatus {
    Uninitialized,
    Ready,
}

struct Committed {
    status: HistoryStatus,
    records: Vec<ScanRecord>,
    stats: ScanStats,
}

pub struct ScanHistory {
    storage: Arc<dyn ScanStorage>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    /// Held for the full duration of initialize/add/delete/clear.
    mutation_gate: Arc<Mutex<()>>,
    committed: Arc<RwLock<Committed>>,
}

impl ScanHistory {
    pub fn new(storage: Arc<dyn ScanStorage>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            mutation_gate: Arc::new(Mutex::new(())),
            committed: Arc::new(RwLock::new(Committed {
                status: HistoryStatus::Uninitialized,
                records: Vec::new(),
                stats: ScanStats::default(),
            })),
        }
    }

    /// History backed by the on-device SQLite database in the app data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        let store = SqliteKeyValueStore::open(&config::database_path())?;
        Ok(Self::new(Arc::new(KeyedScanStorage::new(store))))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    // ── Read path ───────────────────────────────────────────

    fn read_committed(&self) -> RwLockReadGuard<'_, Committed> {
        self.committed
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn status(&self) -> HistoryStatus {
        self.read_committed().status
    }

    pub fn is_ready(&self) -> bool {
        self.status() == HistoryStatus::Ready
    }

    /// All records, in no particular order.
    pub fn records(&self) -> Vec<ScanRecord> {
        self.read_committed().records.clone()
    }

    pub fn snapshot(&self) -> ScanStats {
        self.read_committed().stats.clone()
    }

    pub fn len(&self) -> usize {
        self.read_committed().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, id: &str) -> Option<ScanRecord> {
        self.read_committed()
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Up to `limit` records, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<ScanRecord> {
        most_recent(&self.read_committed().records, limit)
    }

    // ── Mutation path ───────────────────────────────────────

    /// Loads the persisted history. A failed read starts from an empty
    /// history instead of failing. Calling it again once ready does nothing.
    pub async fn initialize(&self) {
        let _gate = self.mutation_gate.lock().await;
        if self.status() == HistoryStatus::Ready {
            return;
        }

        let storage = Arc::clone(&self.storage);
        let loaded = match tokio::task::spawn_blocking(move || storage.load()).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Could not read scan history, starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Scan history load task failed, starting empty");
                Vec::new()
            }
        };

        tracing::info!(count = loaded.len(), "Scan history ready");
        replace_committed(&self.committed, HistoryStatus::Ready, loaded);
    }

    /// Records a new scan and returns it.
    pub async fn add(&self, draft: ScanDraft) -> Result<ScanRecord, HistoryError> {
        let gate = Arc::clone(&self.mutation_gate).lock_owned().await;
        let mut records = self.ready_records()?;
        validate_draft(&draft)?;

        let id = self.ids.next_id();
        if records.iter().any(|existing| existing.id == id) {
            return Err(HistoryError::DuplicateId(id));
        }

        let record = ScanRecord::create(draft, id, &self.clock.now());
        records.push(record.clone());

        self.persist_and_commit(gate, records)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, id = %record.id, "Failed to save new scan");
            })?;

        tracing::info!(id = %record.id, label = %record.label, "Scan added");
        Ok(record)
    }

    /// Removes the scan with `id`. Returns whether anything was removed;
    /// an unknown id is not an error and writes nothing.
    pub async fn delete(&self, id: &str) -> Result<bool, HistoryError> {
        let gate = Arc::clone(&self.mutation_gate).lock_owned().await;
        let mut records = self.ready_records()?;

        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            tracing::debug!(id, "Delete requested for unknown scan");
            return Ok(false);
        }

        self.persist_and_commit(gate, records)
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, id, "Failed to save after delete");
            })?;

        tracing::info!(id, "Scan deleted");
        Ok(true)
    }

    /// Removes every scan.
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let gate = Arc::clone(&self.mutation_gate).lock_owned().await;
        self.ready_records()?;

        self.persist_and_commit(gate, Vec::new())
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, "Failed to save cleared history");
            })?;

        tracing::info!("All scans cleared");
        Ok(())
    }

    fn ready_records(&self) -> Result<Vec<ScanRecord>, HistoryError> {
        let committed = self.read_committed();
        if committed.status != HistoryStatus::Ready {
            return Err(HistoryError::NotReady);
        }
        Ok(committed.records.clone())
    }

    /// Writes the full list and, once the write succeeds, commits it.
    /// The blocking task owns the gate and runs to completion even if the
    /// returned future is dropped.
    async fn persist_and_commit(
        &self,
        gate: OwnedMutexGuard<()>,
        records: Vec<ScanRecord>,
    ) -> Result<(), HistoryError> {
        let storage = Arc::clone(&self.storage);
        let committed = Arc::clone(&self.committed);
        tokio::task::spawn_blocking(move || -> Result<(), HistoryError> {
            let _gate = gate;
            storage.save(&records)?;
            replace_committed(&committed, HistoryStatus::Ready, records);
            Ok(())
        })
        .await
        .map_err(|e| HistoryError::TaskFailed(e.to_string()))?
    }
}

/// Swaps in a new committed state. A poisoned lock is recovered: by the time
/// this runs the records are already durable.
fn replace_committed(
    committed: &RwLock<Committed>,
    status: HistoryStatus,
    records: Vec<ScanRecord>,
) {
    let stats = calculate_stats(&records);
    let mut guard = committed
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Committed {
        status,
        records,
        stats,
    };
}

fn validate_draft(draft: &ScanDraft) -> Result<(), HistoryError> {
    if draft.label.trim().is_empty() {
        return Err(HistoryError::InvalidDraft("label is required".into()));
    }
    if draft.image_reference.trim().is_empty() {
        return Err(HistoryError::InvalidDraft("image reference is required".into()));
    }
    Ok(())
}
