//! Tracing: typed lifecycle events, filtering, and the JSON `structLogs`
//! form understood by external debug tooling.
//!
//! The driver talks to a [`Tracer`] through narrow hooks; [`NoopTracer`]
//! makes every emit site vanish under monomorphization, so tracing costs
//! nothing unless a real tracer is plugged in.

mod collector;
mod events;
mod filter;
mod struct_log;
mod tracer;

pub use collector::{EventCollector, EventSink};
pub use events::{
    CallKind, CreateKind, EventCategory, Severity, TraceEvent, TransactionOutcome,
};
pub use filter::EventFilter;
pub use struct_log::{StructLog, StructLogTrace, StructLogTracer};
pub use tracer::{GasTracer, NoopTracer, Tracer};
