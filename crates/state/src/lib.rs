//! Account and storage model: what the journal journals and the database
//! persists.

mod account;
mod storage;

pub use account::{Account, AccountInfo, AccountStatus};
pub use bytecode::Bytecode;
pub use storage::{EvmState, EvmStorage, StorageSlot, TransientStorage};
