//! The JSON-RPC-compatible "struct log" trace form.

use crate::tracer::{GasTracer, Tracer};
use interpreter::Interpreter;
use primitives::U256;
use serde::Serialize;

/// One executed opcode in `debug_traceTransaction` shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLog {
    /// Program counter before the opcode executed.
    pub pc: u64,
    /// Canonical mnemonic.
    pub op: &'static str,
    /// Gas remaining before the opcode executed.
    pub gas: u64,
    /// Gas the opcode consumed.
    pub gas_cost: u64,
    /// Call depth, root call at 1.
    pub depth: u64,
    /// Stack snapshot, bottom first, hex-encoded big-endian words.
    #[serde(serialize_with = "serialize_hex_words")]
    pub stack: Vec<U256>,
    /// Allocated memory size in bytes.
    pub mem_size: u64,
}

/// A full trace: `{"structLogs": [...], ...}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLogTrace {
    /// One entry per executed opcode.
    pub struct_logs: Vec<StructLog>,
    /// Total gas used by the transaction.
    pub gas: u64,
    /// Whether the transaction failed.
    pub failed: bool,
    /// Hex-encoded output buffer.
    pub return_value: String,
}

fn serialize_hex_words<S: serde::Serializer>(
    stack: &[U256],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;
    let mut seq = serializer.serialize_seq(Some(stack.len()))?;
    for word in stack {
        seq.serialize_element(&format!("0x{word:x}"))?;
    }
    seq.end()
}

/// Tracer that builds a [`StructLogTrace`] during execution.
#[derive(Debug, Default)]
pub struct StructLogTracer {
    logs: Vec<StructLog>,
    gas: GasTracer,
    pending: Option<StructLog>,
}

impl StructLogTracer {
    /// A fresh trace builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the collected steps into the final trace.
    pub fn into_trace(self, gas_used: u64, failed: bool, output: &[u8]) -> StructLogTrace {
        StructLogTrace {
            struct_logs: self.logs,
            gas: gas_used,
            failed,
            return_value: primitives::hex::encode(output),
        }
    }

    /// Steps collected so far.
    pub fn logs(&self) -> &[StructLog] {
        &self.logs
    }
}

impl Tracer for StructLogTracer {
    fn step(&mut self, interpreter: &Interpreter, depth: usize) {
        self.gas.step(interpreter, depth);
        self.pending = Some(StructLog {
            pc: interpreter.pc as u64,
            op: bytecode::OpCode::name_by_op(interpreter.bytecode.opcode(interpreter.pc)),
            gas: interpreter.gas.remaining(),
            gas_cost: 0,
            // The journal depth is already 1 inside the root frame, which
            // matches the struct-log convention of counting from 1.
            depth: depth as u64,
            stack: interpreter.stack.data().to_vec(),
            mem_size: interpreter.memory.len() as u64,
        });
    }

    fn step_end(&mut self, interpreter: &Interpreter, depth: usize) {
        self.gas.step_end(interpreter, depth);
        if let Some(mut log) = self.pending.take() {
            log.gas_cost = self.gas.last_gas_cost();
            self.logs.push(log);
        }
    }
}
