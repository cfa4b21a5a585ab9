//! scopevm: a deterministic EVM execution core built for inspection.
//!
//! The crate wires the member layers together: the [`interpreter`] executes
//! one frame at a time, the [`journal`] tracks every state mutation
//! reversibly, the [`database`] resolves state (in memory or lazily from a
//! remote fork) and the [`tracer`] observes each lifecycle transition.
//! [`Evm`] is the transaction driver on top; `CALL`/`CREATE` recurse
//! through its [`Host`](interpreter::Host) implementation, each nested
//! frame under its own journal checkpoint.

pub mod evm;
pub mod fork_pump;
pub mod precompile;
pub mod result;

pub use evm::Evm;
pub use precompile::{
    Precompiles, PrecompileError, PrecompileFn, PrecompileOutput, PrecompileResult,
};
pub use result::{EvmError, ExecutionResult, Output};

// Re-export the member crates under their short names.
pub use bytecode;
pub use database;
pub use interpreter;
pub use journal;
pub use primitives;
pub use state;
pub use tracer;

use database::Database;
use primitives::Env;

/// Executes one transaction against `db` and returns the outcome together
/// with the touched state (not yet committed).
pub fn execute<DB: Database>(env: Env, db: DB) -> Result<ExecutionResult, EvmError<DB::Error>> {
    Evm::new(env, db).transact()
}
