//! In-memory dataset snapshot store
//!
//! Datasets are replaced wholesale; there is no partial mutation. Each
//! refresh is tagged with a monotonically increasing sequence number
//! obtained *before* the fetch, and [`SnapshotStore::apply`] discards a
//! snapshot whose sequence is not newer than the installed one. A slow
//! response arriving after a fresher one can therefore never clobber it.

use chain_filter::Dataset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

/// Ingest metadata for a mounted snapshot
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SnapshotMeta {
    pub ingest_id: Uuid,
    pub sequence: u64,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub meta: SnapshotMeta,
    pub dataset: Dataset,
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<DatasetSnapshot>>,
    sequence: AtomicU64,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number to tag a refresh with. Obtain it before issuing
    /// the fetch so responses can be ordered by issue time.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a snapshot unless a same-or-newer one is already mounted.
    /// Returns the ingest metadata, or `None` when the snapshot was
    /// discarded as stale.
    pub fn apply(&self, dataset: Dataset, sequence: u64) -> Option<SnapshotMeta> {
        let mut guard = self.current.write().expect("snapshot lock poisoned");

        if let Some(current) = guard.as_ref() {
            if sequence <= current.meta.sequence {
                return None;
            }
        }

        let meta = SnapshotMeta {
            ingest_id: Uuid::new_v4(),
            sequence,
            ingested_at: Utc::now(),
        };
        *guard = Some(DatasetSnapshot { meta, dataset });
        Some(meta)
    }

    /// Clone of the current snapshot, if one is mounted
    pub fn snapshot(&self) -> Option<DatasetSnapshot> {
        self.current
            .read()
            .expect("snapshot lock poisoned")
            .clone()
    }
}
