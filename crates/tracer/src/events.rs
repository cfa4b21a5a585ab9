//! Typed lifecycle events.

use bytecode::OpCode;
use interpreter::{CallScheme, CreateScheme, InstructionResult};
use primitives::{Address, Bytes, B256, U256};
use serde::Serialize;

/// Coarse grouping used by filters and sinks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Transaction lifecycle.
    Transaction,
    /// Call and create frame boundaries.
    Call,
    /// Per-opcode steps.
    Step,
    /// Storage reads and writes.
    State,
    /// Emitted logs.
    Log,
    /// Failures of any kind.
    Error,
}

/// How loud an event is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Which opcode opened a call frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
}

impl From<CallScheme> for CallKind {
    fn from(scheme: CallScheme) -> Self {
        match scheme {
            CallScheme::Call => Self::Call,
            CallScheme::CallCode => Self::CallCode,
            CallScheme::DelegateCall => Self::DelegateCall,
            CallScheme::StaticCall => Self::StaticCall,
        }
    }
}

/// Which opcode opened a creation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateKind {
    Create,
    Create2,
}

impl From<CreateScheme> for CreateKind {
    fn from(scheme: CreateScheme) -> Self {
        match scheme {
            CreateScheme::Create => Self::Create,
            CreateScheme::Create2 { .. } => Self::Create2,
        }
    }
}

/// Final shape of a transaction, attached to `TransactionEnd`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TransactionOutcome {
    /// Output or revert buffer.
    pub output: Bytes,
    /// Gas consumed, refund already applied.
    pub gas_used: u64,
    /// Refund granted at settlement.
    pub gas_refunded: u64,
    /// Whether the transaction succeeded.
    pub success: bool,
    /// Halt reason when it did not.
    pub error: Option<String>,
    /// Address of the deployed contract for creation transactions.
    pub created_address: Option<Address>,
}

/// One entry of the trace stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Transaction started.
    TransactionStart {
        from: Address,
        to: Option<Address>,
        value: U256,
        input: Bytes,
        gas_limit: u64,
        gas_price: U256,
        nonce: Option<u64>,
        tx_type: u8,
        chain_id: Option<u64>,
        max_priority_fee_per_gas: Option<U256>,
    },
    /// Transaction finished.
    TransactionEnd {
        #[serde(flatten)]
        outcome: TransactionOutcome,
    },
    /// A call frame opened.
    CallEnter {
        kind: CallKind,
        from: Address,
        to: Address,
        value: U256,
        input: Bytes,
        gas: u64,
        depth: usize,
    },
    /// A call frame closed.
    CallExit {
        kind: CallKind,
        to: Address,
        output: Bytes,
        gas_left: u64,
        success: bool,
        error: Option<String>,
        depth: usize,
    },
    /// A creation frame opened.
    CreateEnter {
        kind: CreateKind,
        from: Address,
        salt: Option<U256>,
        init_code: Bytes,
        value: U256,
        gas: u64,
        depth: usize,
    },
    /// A creation frame closed.
    CreateExit {
        kind: CreateKind,
        address: Option<Address>,
        code: Bytes,
        success: bool,
        error: Option<String>,
        depth: usize,
    },
    /// One interpreter step.
    VmStep {
        pc: usize,
        op: u8,
        op_name: &'static str,
        gas_remaining: u64,
        gas_cost: u64,
        depth: usize,
        stack: Vec<U256>,
        memory_size: usize,
        return_data_size: usize,
    },
    /// A storage slot was read.
    StorageRead {
        address: Address,
        slot: U256,
        value: U256,
        was_warm: bool,
        depth: usize,
    },
    /// A storage slot was written.
    StorageWrite {
        address: Address,
        slot: U256,
        old_value: U256,
        new_value: U256,
        was_warm: bool,
        depth: usize,
    },
    /// A LOGn fired.
    LogEmitted {
        address: Address,
        topics: Vec<B256>,
        data: Bytes,
        depth: usize,
        index: usize,
    },
    /// A frame halted abnormally.
    FrameError {
        reason: InstructionResult,
        pc: usize,
        depth: usize,
    },
}

impl TraceEvent {
    /// Grouping for filters.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::TransactionStart { .. } => EventCategory::Transaction,
            Self::TransactionEnd { outcome } => {
                if outcome.success {
                    EventCategory::Transaction
                } else {
                    EventCategory::Error
                }
            }
            Self::CallEnter { .. }
            | Self::CallExit { .. }
            | Self::CreateEnter { .. }
            | Self::CreateExit { .. } => EventCategory::Call,
            Self::VmStep { .. } => EventCategory::Step,
            Self::StorageRead { .. } | Self::StorageWrite { .. } => EventCategory::State,
            Self::LogEmitted { .. } => EventCategory::Log,
            Self::FrameError { .. } => EventCategory::Error,
        }
    }

    /// Default loudness per event kind.
    pub fn severity(&self) -> Severity {
        match self {
            Self::VmStep { .. } => Severity::Trace,
            Self::StorageRead { .. } | Self::StorageWrite { .. } => Severity::Debug,
            Self::CallEnter { .. } | Self::CreateEnter { .. } | Self::LogEmitted { .. } => {
                Severity::Debug
            }
            Self::CallExit { success, .. } => {
                if *success {
                    Severity::Debug
                } else {
                    Severity::Warn
                }
            }
            Self::CreateExit { success, .. } => {
                if *success {
                    Severity::Debug
                } else {
                    Severity::Warn
                }
            }
            Self::TransactionStart { .. } => Severity::Info,
            Self::TransactionEnd { outcome } => {
                if outcome.success {
                    Severity::Info
                } else {
                    Severity::Error
                }
            }
            Self::FrameError { reason, .. } => {
                if reason.is_revert() {
                    Severity::Warn
                } else {
                    Severity::Error
                }
            }
        }
    }

    /// Call depth the event happened at, when it has one.
    pub fn depth(&self) -> Option<usize> {
        match self {
            Self::CallEnter { depth, .. }
            | Self::CallExit { depth, .. }
            | Self::CreateEnter { depth, .. }
            | Self::CreateExit { depth, .. }
            | Self::VmStep { depth, .. }
            | Self::StorageRead { depth, .. }
            | Self::StorageWrite { depth, .. }
            | Self::LogEmitted { depth, .. }
            | Self::FrameError { depth, .. } => Some(*depth),
            Self::TransactionStart { .. } | Self::TransactionEnd { .. } => None,
        }
    }

    /// Address the event is about, when it has one.
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::TransactionStart { from, .. } => Some(*from),
            Self::CallEnter { to, .. } | Self::CallExit { to, .. } => Some(*to),
            Self::CreateEnter { from, .. } => Some(*from),
            Self::CreateExit { address, .. } => *address,
            Self::StorageRead { address, .. }
            | Self::StorageWrite { address, .. }
            | Self::LogEmitted { address, .. } => Some(*address),
            _ => None,
        }
    }

    /// Opcode the event is about, when it has one.
    pub fn opcode(&self) -> Option<u8> {
        match self {
            Self::VmStep { op, .. } => Some(*op),
            _ => None,
        }
    }
}

/// Builds the `VmStep` fields shared by every step-shaped sink.
pub(crate) fn step_event(
    interpreter: &interpreter::Interpreter,
    gas_cost: u64,
    depth: usize,
    pc: usize,
    op: u8,
    gas_remaining: u64,
) -> TraceEvent {
    TraceEvent::VmStep {
        pc,
        op,
        op_name: OpCode::name_by_op(op),
        gas_remaining,
        gas_cost,
        depth,
        stack: interpreter.stack.data().to_vec(),
        memory_size: interpreter.memory.len(),
        return_data_size: interpreter.return_data.len(),
    }
}
