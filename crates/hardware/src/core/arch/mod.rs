//! Architectural state owned by the hart.
//!
//! Only the register files live here: they are the destination of every load
//! and the source of every store the LSU performs.

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;
