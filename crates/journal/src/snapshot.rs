//! User-facing one-shot snapshots.
//!
//! Snapshots are coarser than frame checkpoints: an embedder takes one
//! between transactions, may later revert to it exactly once, and any
//! snapshot taken after the restored point dies with the revert.

use crate::journal::JournalCheckpoint;
use std::collections::BTreeMap;
use thiserror::Error;

/// Opaque handle returned by [`Snapshots::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotId(pub u64);

/// Snapshot failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The id was never issued, or its snapshot was already consumed or
    /// invalidated by an earlier revert.
    #[error("invalid or already-consumed snapshot id {}", (.0).0)]
    InvalidSnapshot(SnapshotId),
}

/// Registry of live snapshots.
#[derive(Debug, Default)]
pub struct Snapshots {
    next_id: u64,
    live: BTreeMap<u64, JournalCheckpoint>,
}

impl Snapshots {
    /// Registers a checkpoint and mints its id.
    pub fn register(&mut self, checkpoint: JournalCheckpoint) -> SnapshotId {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, checkpoint);
        SnapshotId(id)
    }

    /// Consumes a snapshot. Every snapshot taken after it is invalidated,
    /// since the journal below them is gone once the caller reverts.
    pub fn consume(&mut self, id: SnapshotId) -> Result<JournalCheckpoint, SnapshotError> {
        let checkpoint = self
            .live
            .remove(&id.0)
            .ok_or(SnapshotError::InvalidSnapshot(id))?;
        self.live.retain(|_, cp| cp.journal_i < checkpoint.journal_i);
        Ok(checkpoint)
    }

    /// Number of live snapshots.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no snapshot is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops all live snapshots; called when the state they reference is
    /// discarded wholesale.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}
