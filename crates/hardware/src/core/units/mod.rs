//! Execution units taking part in memory accesses.
//!
//! The load/store unit does the work; the memory management unit translates
//! addresses for its atomic accesses.

/// Load/Store Unit for memory access operations.
pub mod lsu;

/// Memory Management Unit (address translation contract and reference translator).
pub mod mmu;
