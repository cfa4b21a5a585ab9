//! Event-stream tracer: converts hooks into [`TraceEvent`]s and pushes
//! them at a sink.

use crate::{
    events::{step_event, CallKind, CreateKind, TraceEvent, TransactionOutcome},
    filter::EventFilter,
    tracer::{GasTracer, Tracer},
};
use interpreter::{CallInputs, CallOutcome, CreateInputs, CreateOutcome, CreateScheme, Interpreter};
use primitives::{Address, Env, Log, TransactTo, U256};
use std::sync::mpsc;

/// Where collected events go.
#[derive(Debug)]
pub enum EventSink {
    /// Kept in memory, drained with [`EventCollector::take_events`].
    Buffer(Vec<TraceEvent>),
    /// Pushed into a channel as they happen; a disconnected receiver
    /// silently drops the stream.
    Channel(mpsc::Sender<TraceEvent>),
}

/// A [`Tracer`] that materialises the typed event stream.
#[derive(Debug)]
pub struct EventCollector {
    filter: EventFilter,
    sink: EventSink,
    gas: GasTracer,
    // Step context captured in `step`, emitted in `step_end` once the cost
    // is known.
    pending_pc: usize,
    pending_op: u8,
    pending_gas: u64,
}

impl Default for EventCollector {
    fn default() -> Self {
        Self::buffered(EventFilter::all())
    }
}

impl EventCollector {
    /// Collects matching events into an internal buffer.
    pub fn buffered(filter: EventFilter) -> Self {
        Self {
            filter,
            sink: EventSink::Buffer(Vec::new()),
            gas: GasTracer::new(),
            pending_pc: 0,
            pending_op: 0,
            pending_gas: 0,
        }
    }

    /// Pushes matching events into `sender`.
    pub fn subscribed(filter: EventFilter, sender: mpsc::Sender<TraceEvent>) -> Self {
        Self {
            filter,
            sink: EventSink::Channel(sender),
            gas: GasTracer::new(),
            pending_pc: 0,
            pending_op: 0,
            pending_gas: 0,
        }
    }

    /// Drains the buffered events. Empty for channel sinks.
    pub fn take_events(&mut self) -> Vec<TraceEvent> {
        match &mut self.sink {
            EventSink::Buffer(events) => core::mem::take(events),
            EventSink::Channel(_) => Vec::new(),
        }
    }

    fn emit(&mut self, event: TraceEvent) {
        if !self.filter.matches(&event) {
            return;
        }
        match &mut self.sink {
            EventSink::Buffer(events) => events.push(event),
            EventSink::Channel(sender) => {
                let _ = sender.send(event);
            }
        }
    }
}

impl Tracer for EventCollector {
    fn transaction_start(&mut self, env: &Env) {
        let to = match env.tx.transact_to {
            TransactTo::Call(address) => Some(address),
            TransactTo::Create => None,
        };
        self.emit(TraceEvent::TransactionStart {
            from: env.tx.caller,
            to,
            value: env.tx.value,
            input: env.tx.data.clone(),
            gas_limit: env.tx.gas_limit,
            gas_price: env.tx.gas_price,
            nonce: env.tx.nonce,
            tx_type: env.tx.tx_type,
            chain_id: env.tx.chain_id,
            max_priority_fee_per_gas: env.tx.gas_priority_fee,
        });
    }

    fn transaction_end(&mut self, outcome: &TransactionOutcome) {
        self.emit(TraceEvent::TransactionEnd {
            outcome: outcome.clone(),
        });
    }

    fn step(&mut self, interpreter: &Interpreter, depth: usize) {
        self.gas.step(interpreter, depth);
        self.pending_pc = interpreter.pc;
        self.pending_op = interpreter.bytecode.opcode(interpreter.pc);
        self.pending_gas = interpreter.gas.remaining();
    }

    fn step_end(&mut self, interpreter: &Interpreter, depth: usize) {
        self.gas.step_end(interpreter, depth);
        let event = step_event(
            interpreter,
            self.gas.last_gas_cost(),
            depth,
            self.pending_pc,
            self.pending_op,
            self.pending_gas,
        );
        self.emit(event);
        if !interpreter.instruction_result.is_continue()
            && !interpreter.instruction_result.is_ok()
        {
            self.emit(TraceEvent::FrameError {
                reason: interpreter.instruction_result,
                pc: self.pending_pc,
                depth,
            });
        }
    }

    fn call(&mut self, inputs: &CallInputs, depth: usize) {
        self.emit(TraceEvent::CallEnter {
            kind: CallKind::from(inputs.scheme),
            from: inputs.caller,
            to: inputs.target_address,
            value: inputs.value.get(),
            input: inputs.input.clone(),
            gas: inputs.gas_limit,
            depth,
        });
    }

    fn call_end(&mut self, inputs: &CallInputs, outcome: &CallOutcome, depth: usize) {
        let success = outcome.result.is_ok();
        self.emit(TraceEvent::CallExit {
            kind: CallKind::from(inputs.scheme),
            to: inputs.target_address,
            output: outcome.result.output.clone(),
            gas_left: outcome.result.gas.remaining(),
            success,
            error: (!success).then(|| format!("{:?}", outcome.result.result)),
            depth,
        });
    }

    fn create(&mut self, inputs: &CreateInputs, depth: usize) {
        let salt = match inputs.scheme {
            CreateScheme::Create2 { salt } => Some(salt),
            CreateScheme::Create => None,
        };
        self.emit(TraceEvent::CreateEnter {
            kind: CreateKind::from(inputs.scheme),
            from: inputs.caller,
            salt,
            init_code: inputs.init_code.clone(),
            value: inputs.value,
            gas: inputs.gas_limit,
            depth,
        });
    }

    fn create_end(&mut self, inputs: &CreateInputs, outcome: &CreateOutcome, depth: usize) {
        let success = outcome.result.is_ok();
        self.emit(TraceEvent::CreateExit {
            kind: CreateKind::from(inputs.scheme),
            address: outcome.address,
            code: outcome.result.output.clone(),
            success,
            error: (!success).then(|| format!("{:?}", outcome.result.result)),
            depth,
        });
    }

    fn log(&mut self, log: &Log, depth: usize, index: usize) {
        self.emit(TraceEvent::LogEmitted {
            address: log.address,
            topics: log.topics().to_vec(),
            data: log.data.data.clone(),
            depth,
            index,
        });
    }

    fn storage_read(&mut self, address: Address, slot: U256, value: U256, was_warm: bool, depth: usize) {
        self.emit(TraceEvent::StorageRead {
            address,
            slot,
            value,
            was_warm,
            depth,
        });
    }

    fn storage_write(
        &mut self,
        address: Address,
        slot: U256,
        old_value: U256,
        new_value: U256,
        was_warm: bool,
        depth: usize,
    ) {
        self.emit(TraceEvent::StorageWrite {
            address,
            slot,
            old_value,
            new_value,
            was_warm,
            depth,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventCategory;

    #[test]
    fn channel_sink_streams_events() {
        let (sender, receiver) = mpsc::channel();
        let mut collector = EventCollector::subscribed(EventFilter::all(), sender);
        collector.storage_read(Address::ZERO, U256::ZERO, U256::from(1), true, 2);
        drop(collector);
        let events: Vec<_> = receiver.iter().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category(), EventCategory::State);
    }

    #[test]
    fn buffer_sink_respects_filter() {
        let filter = EventFilter::all().with_categories([EventCategory::Log]);
        let mut collector = EventCollector::buffered(filter);
        collector.storage_read(Address::ZERO, U256::ZERO, U256::ZERO, false, 1);
        let log = Log {
            address: Address::ZERO,
            data: primitives::LogData::new_unchecked(Vec::new(), primitives::Bytes::new()),
        };
        collector.log(&log, 1, 0);
        let events = collector.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TraceEvent::LogEmitted { .. }));
    }
}
