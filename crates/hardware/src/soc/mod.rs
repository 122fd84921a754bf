//! System-on-Chip (SoC) side of the data master.
//!
//! This module holds the contract every downstream target implements and the
//! RAM target used to run the core stand-alone.

/// RAM target and its atomic ALU.
pub mod memory;

/// Memory port contract.
pub mod traits;

pub use memory::Ram;
pub use traits::MemoryPort;
