//! Timing accounting for memory accesses.
//!
//! This module tracks the cycle and event counters the LSU charges. It provides:
//! 1. **Contract:** The `TimingTracker` trait the LSU calls into without owning it.
//! 2. **Counters:** `Timing`, the reference tracker (stall cycles, load events,
//!    misaligned events, accounted cycles).
//! 3. **Reporting:** JSON serialization of the counters.

use serde::Serialize;

/// Timing/accounting sink consumed by the LSU.
pub trait TimingTracker {
    /// Charges `cycles` of memory latency as instruction stall time.
    fn charge_load_latency(&mut self, cycles: u64);

    /// Counts `count` accesses that straddled an alignment boundary.
    fn charge_misaligned_event(&mut self, count: u64);

    /// Counts `count` extra load/store bus accesses.
    fn charge_load_event(&mut self, count: u64);

    /// Accounts one elapsed cycle.
    fn advance_cycle(&mut self);
}

/// Reference timing tracker: plain counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Timing {
    /// Stall cycles charged from memory latency.
    pub stall_cycles: u64,
    /// Extra load/store events (second halves of split accesses).
    pub load_events: u64,
    /// Accesses that had to be split.
    pub misaligned_events: u64,
    /// Cycles accounted by the LSU.
    pub cycles: u64,
}

impl Timing {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the counters to a JSON object.
    ///
    /// # Errors
    ///
    /// Propagates the serializer error; plain integer counters do not produce one in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl TimingTracker for Timing {
    fn charge_load_latency(&mut self, cycles: u64) {
        self.stall_cycles += cycles;
    }

    fn charge_misaligned_event(&mut self, count: u64) {
        self.misaligned_events += count;
    }

    fn charge_load_event(&mut self, count: u64) {
        self.load_events += count;
    }

    fn advance_cycle(&mut self) {
        self.cycles += 1;
    }
}
