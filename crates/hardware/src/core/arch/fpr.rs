//! Floating-Point Register File.
//!
//! Thirty-two 64-bit registers (`f0`-`f31`) holding raw IEEE 754 bit
//! patterns. Narrow values are NaN-boxed by whoever writes them.

/// Floating-Point Register file.
#[derive(Clone, Debug)]
pub struct Fpr {
    fregs: [u64; 32],
}

impl Fpr {
    /// Width of every FP register in bytes.
    pub const WIDTH: usize = 8;

    /// Creates a new floating-point register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self { fregs: [0; 32] }
    }

    /// Reads a floating-point register value as raw bits.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid register index (0-31).
    pub const fn read(&self, idx: usize) -> u64 {
        self.fregs[idx]
    }

    /// Writes a floating-point register value from raw bits.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not a valid register index (0-31).
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.fregs[idx] = val;
    }
}

impl Default for Fpr {
    fn default() -> Self {
        Self::new()
    }
}
