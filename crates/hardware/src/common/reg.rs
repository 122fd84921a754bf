//! Unified Register File.
//!
//! This module provides the `RegisterFile` struct, the single place the LSU
//! reads store data from and writes load data to. It provides:
//! 1. **Unified Storage:** Integer and floating-point registers behind one interface.
//! 2. **Register Identifiers:** `RegId` names a register in either file.
//! 3. **Byte Slots:** `DataSlot` addresses a byte range inside a register, the
//!    owned replacement for a raw data pointer into register storage. Split
//!    accesses write their second half at a non-zero slot offset.

use std::fmt;

use crate::config::Xlen;
use crate::core::arch::fpr::Fpr;
use crate::core::arch::gpr::Gpr;

/// Identifies one architectural register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegId {
    /// Integer register `x<n>`.
    Gpr(usize),
    /// Floating-point register `f<n>`.
    Fpr(usize),
}

impl fmt::Display for RegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpr(idx) => write!(f, "x{idx}"),
            Self::Fpr(idx) => write!(f, "f{idx}"),
        }
    }
}

/// A byte range start inside a register, little-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DataSlot {
    /// Register holding the data.
    pub reg: RegId,
    /// Offset of the first byte inside the register.
    pub offset: usize,
}

impl DataSlot {
    /// Slot starting at byte 0 of `reg`.
    pub const fn new(reg: RegId) -> Self {
        Self { reg, offset: 0 }
    }

    /// Slot `bytes` further into the same register.
    pub const fn advance(self, bytes: usize) -> Self {
        Self {
            reg: self.reg,
            offset: self.offset + bytes,
        }
    }
}

/// Unified register file containing both general-purpose and floating-point registers.
#[derive(Clone, Debug)]
pub struct RegisterFile {
    gpr: Gpr,
    fpr: Fpr,
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new(xlen: Xlen) -> Self {
        Self {
            gpr: Gpr::new(xlen),
            fpr: Fpr::new(),
        }
    }

    /// Reads a value from a general-purpose register.
    pub const fn read(&self, idx: usize) -> u64 {
        self.gpr.read(idx)
    }

    /// Writes a value to a general-purpose register.
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.gpr.write(idx, val);
    }

    /// Reads a value from a floating-point register.
    pub const fn read_f(&self, idx: usize) -> u64 {
        self.fpr.read(idx)
    }

    /// Writes a value to a floating-point register.
    pub const fn write_f(&mut self, idx: usize, val: u64) {
        self.fpr.write(idx, val);
    }

    /// Reads any register.
    pub const fn get(&self, reg: RegId) -> u64 {
        match reg {
            RegId::Gpr(idx) => self.gpr.read(idx),
            RegId::Fpr(idx) => self.fpr.read(idx),
        }
    }

    /// Writes any register.
    pub const fn set(&mut self, reg: RegId, val: u64) {
        match reg {
            RegId::Gpr(idx) => self.gpr.write(idx, val),
            RegId::Fpr(idx) => self.fpr.write(idx, val),
        }
    }

    /// Width of `reg` in bytes: `XLEN/8` for integer registers, 8 for FP registers.
    pub const fn width(&self, reg: RegId) -> usize {
        match reg {
            RegId::Gpr(_) => self.gpr.width(),
            RegId::Fpr(_) => Fpr::WIDTH,
        }
    }

    /// Copies `out.len()` bytes of the slot into `out`.
    ///
    /// # Panics
    ///
    /// Panics if the slot runs past the 8-byte register storage; the LSU
    /// validates slots against [`RegisterFile::width`] before calling.
    pub fn read_bytes(&self, slot: DataSlot, out: &mut [u8]) {
        let bytes = self.get(slot.reg).to_le_bytes();
        out.copy_from_slice(&bytes[slot.offset..slot.offset + out.len()]);
    }

    /// Overwrites `data.len()` bytes of the slot, leaving the rest of the register intact.
    ///
    /// # Panics
    ///
    /// Panics if the slot runs past the 8-byte register storage.
    pub fn write_bytes(&mut self, slot: DataSlot, data: &[u8]) {
        let mut bytes = self.get(slot.reg).to_le_bytes();
        bytes[slot.offset..slot.offset + data.len()].copy_from_slice(data);
        self.set(slot.reg, u64::from_le_bytes(bytes));
    }
}
