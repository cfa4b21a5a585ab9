//! Journaled state: the host-side state manager the interpreter talks to.
//!
//! Every mutation appends a reversible [`JournalEntry`] to a flat log.
//! Call frames take [checkpoints](Journal::checkpoint) that commit by simply
//! outliving the frame or revert by replaying the log backwards; embedders
//! take coarser one-shot [snapshots](Journal::snapshot) between transactions.

mod entry;
mod journal;
mod snapshot;
mod types;

pub use entry::JournalEntry;
pub use journal::{Journal, JournalCheckpoint, JournalOutput};
pub use snapshot::{SnapshotError, SnapshotId, Snapshots};
pub use types::{
    AccountLoad, DelegateLoad, SStoreResult, SelfDestructResult, StateLoad, TransferError,
};
