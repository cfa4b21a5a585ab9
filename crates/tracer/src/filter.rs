//! Event filtering.

use crate::events::{EventCategory, Severity, TraceEvent};
use primitives::{Address, HashSet};

/// Which events a sink wants to see.
///
/// An empty set means "everything" for that dimension; depth bounds are
/// inclusive. Filters compose with AND across dimensions.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// Only events at or below this severity are dropped.
    pub min_severity: Option<Severity>,
    /// Inclusive depth window.
    pub min_depth: Option<usize>,
    /// Inclusive depth window.
    pub max_depth: Option<usize>,
    /// Only events about these addresses.
    pub addresses: HashSet<Address>,
    /// Only steps executing these opcodes.
    pub opcodes: HashSet<u8>,
    /// Only these categories.
    pub categories: HashSet<EventCategory>,
}

impl EventFilter {
    /// A filter that passes everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to the given categories.
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = EventCategory>) -> Self {
        self.categories = categories.into_iter().collect();
        self
    }

    /// Restricts to events about the given addresses.
    pub fn with_addresses(mut self, addresses: impl IntoIterator<Item = Address>) -> Self {
        self.addresses = addresses.into_iter().collect();
        self
    }

    /// Restricts steps to the given opcodes.
    pub fn with_opcodes(mut self, opcodes: impl IntoIterator<Item = u8>) -> Self {
        self.opcodes = opcodes.into_iter().collect();
        self
    }

    /// Restricts to a depth window.
    pub fn with_depth_range(mut self, min: usize, max: usize) -> Self {
        self.min_depth = Some(min);
        self.max_depth = Some(max);
        self
    }

    /// Drops events quieter than `severity`.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Whether `event` passes the filter.
    pub fn matches(&self, event: &TraceEvent) -> bool {
        if let Some(min) = self.min_severity {
            if event.severity() < min {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&event.category()) {
            return false;
        }
        if let Some(depth) = event.depth() {
            if self.min_depth.is_some_and(|min| depth < min)
                || self.max_depth.is_some_and(|max| depth > max)
            {
                return false;
            }
        }
        if !self.addresses.is_empty() {
            match event.address() {
                Some(address) if self.addresses.contains(&address) => {}
                _ => return false,
            }
        }
        if !self.opcodes.is_empty() {
            match event.opcode() {
                // Non-step events pass an opcode filter untouched.
                None => {}
                Some(op) if self.opcodes.contains(&op) => {}
                Some(_) => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitives::{address, U256};

    fn step(op: u8, depth: usize) -> TraceEvent {
        TraceEvent::VmStep {
            pc: 0,
            op,
            op_name: bytecode::OpCode::name_by_op(op),
            gas_remaining: 0,
            gas_cost: 0,
            depth,
            stack: Vec::new(),
            memory_size: 0,
            return_data_size: 0,
        }
    }

    #[test]
    fn category_filter() {
        let filter = EventFilter::all().with_categories([EventCategory::Step]);
        assert!(filter.matches(&step(0x01, 1)));
        let read = TraceEvent::StorageRead {
            address: Address::ZERO,
            slot: U256::ZERO,
            value: U256::ZERO,
            was_warm: false,
            depth: 1,
        };
        assert!(!filter.matches(&read));
    }

    #[test]
    fn opcode_and_depth_filters() {
        let filter = EventFilter::all()
            .with_opcodes([0x55u8])
            .with_depth_range(1, 2);
        assert!(filter.matches(&step(0x55, 1)));
        assert!(!filter.matches(&step(0x54, 1)));
        assert!(!filter.matches(&step(0x55, 3)));
    }

    #[test]
    fn address_filter() {
        let tracked = address!("00000000000000000000000000000000000000aa");
        let filter = EventFilter::all().with_addresses([tracked]);
        let hit = TraceEvent::StorageWrite {
            address: tracked,
            slot: U256::ZERO,
            old_value: U256::ZERO,
            new_value: U256::from(1),
            was_warm: true,
            depth: 1,
        };
        assert!(filter.matches(&hit));
        let miss = TraceEvent::StorageWrite {
            address: Address::ZERO,
            slot: U256::ZERO,
            old_value: U256::ZERO,
            new_value: U256::from(1),
            was_warm: true,
            depth: 1,
        };
        assert!(!filter.matches(&miss));
    }

    #[test]
    fn severity_floor() {
        let filter = EventFilter::all().with_min_severity(Severity::Info);
        assert!(!filter.matches(&step(0x01, 1)));
    }
}
