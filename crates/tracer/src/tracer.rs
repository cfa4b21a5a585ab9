//! The tracer interface.

use crate::events::TransactionOutcome;
use interpreter::{
    CallInputs, CallOutcome, CreateInputs, CreateOutcome, Interpreter,
};
use primitives::{Address, Env, Log};

/// Hooks the transaction driver fires at every lifecycle transition.
///
/// All hooks default to no-ops; a driver parameterised with [`NoopTracer`]
/// compiles the emit sites away entirely.
pub trait Tracer {
    /// Transaction is about to execute.
    fn transaction_start(&mut self, env: &Env) {
        let _ = env;
    }

    /// Transaction finished and settled.
    fn transaction_end(&mut self, outcome: &TransactionOutcome) {
        let _ = outcome;
    }

    /// An opcode is about to execute.
    fn step(&mut self, interpreter: &Interpreter, depth: usize) {
        let _ = (interpreter, depth);
    }

    /// The opcode finished (or halted the frame).
    fn step_end(&mut self, interpreter: &Interpreter, depth: usize) {
        let _ = (interpreter, depth);
    }

    /// A call frame is about to open.
    fn call(&mut self, inputs: &CallInputs, depth: usize) {
        let _ = (inputs, depth);
    }

    /// A call frame closed.
    fn call_end(&mut self, inputs: &CallInputs, outcome: &CallOutcome, depth: usize) {
        let _ = (inputs, outcome, depth);
    }

    /// A creation frame is about to open.
    fn create(&mut self, inputs: &CreateInputs, depth: usize) {
        let _ = (inputs, depth);
    }

    /// A creation frame closed.
    fn create_end(&mut self, inputs: &CreateInputs, outcome: &CreateOutcome, depth: usize) {
        let _ = (inputs, outcome, depth);
    }

    /// A log was emitted.
    fn log(&mut self, log: &Log, depth: usize, index: usize) {
        let _ = (log, depth, index);
    }

    /// A storage slot was read.
    fn storage_read(&mut self, address: Address, slot: primitives::U256, value: primitives::U256, was_warm: bool, depth: usize) {
        let _ = (address, slot, value, was_warm, depth);
    }

    /// A storage slot was written.
    fn storage_write(
        &mut self,
        address: Address,
        slot: primitives::U256,
        old_value: primitives::U256,
        new_value: primitives::U256,
        was_warm: bool,
        depth: usize,
    ) {
        let _ = (address, slot, old_value, new_value, was_warm, depth);
    }

    /// A contract scheduled its own destruction.
    fn selfdestruct(&mut self, contract: Address, beneficiary: Address, depth: usize) {
        let _ = (contract, beneficiary, depth);
    }
}

/// Tracer that observes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Tracks the gas cost of each step, the building block other tracers use
/// for their `gasCost` fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct GasTracer {
    gas_remaining: u64,
    last_gas_cost: u64,
}

impl GasTracer {
    /// A fresh tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gas observed before the current step.
    pub fn gas_remaining(&self) -> u64 {
        self.gas_remaining
    }

    /// Cost of the most recently completed step.
    pub fn last_gas_cost(&self) -> u64 {
        self.last_gas_cost
    }
}

impl Tracer for GasTracer {
    fn step(&mut self, interpreter: &Interpreter, _depth: usize) {
        self.gas_remaining = interpreter.gas.remaining();
    }

    fn step_end(&mut self, interpreter: &Interpreter, _depth: usize) {
        // A halting step may have consumed everything; saturate rather
        // than wrap when a child frame returned gas in between.
        self.last_gas_cost = self
            .gas_remaining
            .saturating_sub(interpreter.gas.remaining());
    }
}
