//! The interface a frame uses to reach state, environment and nested calls.

use crate::inputs::{CallInputs, CallOutcome, CreateInputs, CreateOutcome};
use crate::instruction_result::{InstructionResult, InterpreterResult};
use primitives::{Address, Bytes, Env, Log, B256, U256};

pub use journal::{AccountLoad, SStoreResult, SelfDestructResult, StateLoad};

/// Host of a running frame.
///
/// State accessors return `None` when the backing store cannot answer (a
/// fork backend miss, for instance); the instruction then halts the frame
/// with [`InstructionResult::StateUnavailable`]. `call` and `create`
/// recurse: the host pushes a journal checkpoint, runs the nested frame and
/// commits or reverts it before returning.
pub trait Host {
    /// Execution environment.
    fn env(&self) -> &Env;

    /// Loads an account for CALL-family pricing: warmth, emptiness and
    /// EIP-7702 delegate.
    fn load_account_delegated(&mut self, address: Address) -> Option<StateLoad<AccountLoad>>;

    /// Account balance.
    fn balance(&mut self, address: Address) -> Option<StateLoad<U256>>;

    /// Account code, delegation designators included verbatim.
    fn code(&mut self, address: Address) -> Option<StateLoad<Bytes>>;

    /// Keccak-256 of the account code; zero word for non-existent accounts.
    fn code_hash(&mut self, address: Address) -> Option<StateLoad<B256>>;

    /// Reads a storage slot.
    fn sload(&mut self, address: Address, key: U256) -> Option<StateLoad<U256>>;

    /// Writes a storage slot, returning the transition triple.
    fn sstore(
        &mut self,
        address: Address,
        key: U256,
        value: U256,
    ) -> Option<StateLoad<SStoreResult>>;

    /// Reads transient storage (EIP-1153).
    fn tload(&mut self, address: Address, key: U256) -> U256;

    /// Writes transient storage (EIP-1153).
    fn tstore(&mut self, address: Address, key: U256, value: U256);

    /// Emits a log.
    fn log(&mut self, log: Log);

    /// Marks `address` for destruction in favour of `target`.
    fn selfdestruct(
        &mut self,
        address: Address,
        target: Address,
    ) -> Option<StateLoad<SelfDestructResult>>;

    /// Hash of a historical block.
    fn block_hash(&mut self, number: u64) -> Option<B256>;

    /// Runs a nested message call.
    fn call(&mut self, inputs: CallInputs) -> CallOutcome;

    /// Runs a nested creation.
    fn create(&mut self, inputs: CreateInputs) -> CreateOutcome;

    /// Per-step tracer hook; default is a no-op that vanishes under
    /// monomorphization.
    fn step(&mut self, _interpreter: &mut crate::interpreter::Interpreter) {}

    /// Post-step tracer hook.
    fn step_end(&mut self, _interpreter: &mut crate::interpreter::Interpreter) {}
}

/// A host with no state behind it, for instruction unit tests.
#[derive(Clone, Debug, Default)]
pub struct DummyHost {
    /// Environment returned by [`Host::env`].
    pub env: Env,
    /// Logs collected from LOGn.
    pub logs: Vec<Log>,
}

impl DummyHost {
    /// Host with the given environment.
    pub fn with_env(env: Env) -> Self {
        Self {
            env,
            logs: Vec::new(),
        }
    }
}

impl Host for DummyHost {
    fn env(&self) -> &Env {
        &self.env
    }

    fn load_account_delegated(&mut self, _address: Address) -> Option<StateLoad<AccountLoad>> {
        Some(StateLoad::default())
    }

    fn balance(&mut self, _address: Address) -> Option<StateLoad<U256>> {
        Some(StateLoad::default())
    }

    fn code(&mut self, _address: Address) -> Option<StateLoad<Bytes>> {
        Some(StateLoad::default())
    }

    fn code_hash(&mut self, _address: Address) -> Option<StateLoad<B256>> {
        Some(StateLoad::default())
    }

    fn sload(&mut self, _address: Address, _key: U256) -> Option<StateLoad<U256>> {
        Some(StateLoad::default())
    }

    fn sstore(
        &mut self,
        _address: Address,
        _key: U256,
        _value: U256,
    ) -> Option<StateLoad<SStoreResult>> {
        Some(StateLoad::default())
    }

    fn tload(&mut self, _address: Address, _key: U256) -> U256 {
        U256::ZERO
    }

    fn tstore(&mut self, _address: Address, _key: U256, _value: U256) {}

    fn log(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn selfdestruct(
        &mut self,
        _address: Address,
        _target: Address,
    ) -> Option<StateLoad<SelfDestructResult>> {
        Some(StateLoad::default())
    }

    fn block_hash(&mut self, _number: u64) -> Option<B256> {
        Some(B256::ZERO)
    }

    fn call(&mut self, inputs: CallInputs) -> CallOutcome {
        CallOutcome::new(InterpreterResult::new(
            InstructionResult::Stop,
            Bytes::new(),
            crate::gas::Gas::new(inputs.gas_limit),
        ))
    }

    fn create(&mut self, inputs: CreateInputs) -> CreateOutcome {
        CreateOutcome::new(
            InterpreterResult::new(
                InstructionResult::Stop,
                Bytes::new(),
                crate::gas::Gas::new(inputs.gas_limit),
            ),
            None,
        )
    }
}
