//! Load-store core of a cycle-level instruction-set simulator.
//!
//! This crate implements the memory-access execution core of a scalar, in-order
//! embedded RISC-V ISS with the following:
//! 1. **LSU:** Turns an instruction's logical access into one or two bus transactions,
//!    tracks their completion and resumes the instruction exactly once.
//! 2. **Collaborators:** Execution control, timing accounting and address translation
//!    contracts, each with a reference implementation.
//! 3. **SoC:** The memory-port contract and a RAM target that answers synchronously
//!    or asynchronously.
//! 4. **Simulation:** Configuration and the `Iss` driver that delivers responses
//!    and held-instruction resumes cycle by cycle.

/// Common types (addresses, register file, access types, errors).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Core (architectural state, execution control, LSU, MMU).
pub mod core;
/// System-on-chip side (memory-port contract, RAM target).
pub mod soc;
/// Timing accounting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Per-hart driver owning the LSU and its collaborators.
pub use crate::core::Iss;
/// The load-store unit itself.
pub use crate::core::units::lsu::Lsu;
