//! General-Purpose Register File.
//!
//! This module implements the integer register file of the simulated hart.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`).
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.
//! 3. **Width Enforcement:** Truncates writes to the configured `XLEN`.

use crate::config::Xlen;

/// General-Purpose Register file.
///
/// Registers are stored as 64-bit values; on an RV32 hart every write is
/// truncated to 32 bits so the upper half always reads as zero.
#[derive(Clone, Debug)]
pub struct Gpr {
    regs: [u64; 32],
    xlen: Xlen,
}

impl Gpr {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new(xlen: Xlen) -> Self {
        Self {
            regs: [0; 32],
            xlen,
        }
    }

    /// Reads a general-purpose register value.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid register index (0-31).
    pub const fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a value to a general-purpose register. Writes to `x0` are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid register index (0-31).
    pub const fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx] = self.xlen.mask(val);
        }
    }

    /// Register width in bytes.
    pub const fn width(&self) -> usize {
        self.xlen.bytes()
    }
}
