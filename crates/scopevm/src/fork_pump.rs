//! The fork request pump.
//!
//! Against a [`ForkDb`], a state read can surface
//! [`ForkDbError::Pending`]: the data lives on a remote chain and a typed
//! request is now queued. Execution stays synchronous by unwinding to the
//! driver, which drains the queue, resolves each request out-of-band
//! through a caller-supplied function, feeds the responses back and re-runs
//! the transaction. Execution is deterministic and the fork caches are
//! append-only, so the re-run replays to the originating read and finds it
//! answered; each round consumes one unit of the retry budget.

use crate::{
    evm::Evm,
    result::{EvmError, ExecutionResult},
};
use database::{ForkDb, ForkDbError, ForkRequest, FORK_RETRY_BUDGET};
use tracer::Tracer;

impl<TR: Tracer> Evm<ForkDb, TR> {
    /// Next remote request awaiting execution, if any.
    pub fn next_pending_request(&mut self) -> Option<ForkRequest> {
        self.db().next_pending_request()
    }

    /// Feeds the raw JSON response for a pending request back in.
    pub fn resume_request(
        &mut self,
        request_id: u64,
        response_json: &str,
    ) -> Result<(), ForkDbError> {
        self.db().resume(request_id, response_json)
    }

    /// Runs the transaction, pumping fork requests through `resolver`
    /// until it completes or the retry budget (at least ten rounds) is
    /// exhausted.
    ///
    /// `resolver` executes one request against whatever transport the
    /// embedder has and returns the raw response JSON; `None` marks the
    /// request unresolvable and fails the transaction.
    pub fn transact_with_fork_pump<F>(
        &mut self,
        mut resolver: F,
    ) -> Result<ExecutionResult, EvmError<ForkDbError>>
    where
        F: FnMut(&ForkRequest) -> Option<String>,
    {
        for round in 0..FORK_RETRY_BUDGET {
            match self.transact() {
                Err(EvmError::Database(ForkDbError::Pending { .. })) => {
                    tracing::debug!(target: "fork", round, "pumping pending fork requests");
                    while let Some(request) = self.next_pending_request() {
                        let Some(response) = resolver(&request) else {
                            return Err(EvmError::Database(ForkDbError::Unavailable(format!(
                                "resolver failed {} request {}",
                                request.method(),
                                request.id
                            ))));
                        };
                        self.resume_request(request.id, &response)
                            .map_err(EvmError::Database)?;
                    }
                }
                other => return other,
            }
        }
        Err(EvmError::Database(ForkDbError::Unavailable(format!(
            "fork retry budget of {FORK_RETRY_BUDGET} rounds exhausted"
        ))))
    }
}
