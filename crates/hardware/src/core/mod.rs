//! Core processor implementation.
//!
//! This module contains the per-hart state and the units that access memory:
//! the architectural register files, execution control and the `Iss` driver,
//! and the load/store and address translation units.

/// Architecture-specific components (register files).
pub mod arch;

/// Hart driver and instruction lifecycle control.
pub mod cpu;

/// Execution units (LSU, MMU).
pub mod units;

pub use self::cpu::Iss;
