//! RAM memory target.
//!
//! This module implements the reference memory port. It provides:
//! 1. **Storage:** A byte buffer mapped at a physical base address.
//! 2. **Protocol:** Synchronous (`Ok`) or asynchronous (`Pending`, retired on a later
//!    tick) answers, selected by [`ResponseMode`]; out-of-range accesses are `Invalid`.
//! 3. **Atomics:** Read-modify-write through the [`amo`] ALU plus per-initiator
//!    load-reserve/store-conditional reservations.

/// Atomic read-modify-write arithmetic.
pub mod amo;

use std::collections::HashMap;
use std::fmt;

use tracing::{trace, warn};

use self::amo::amo_alu;
use crate::config::{MemoryConfig, ResponseMode};
use crate::core::units::lsu::{AtomicOp, IoOpcode, IoReq, IoStatus};
use crate::soc::traits::MemoryPort;

/// Store-conditional result written back on success.
const SC_SUCCESS: u64 = 0;
/// Store-conditional result written back on failure.
const SC_FAILURE: u64 = 1;

/// RAM target answering the LSU's data transactions.
pub struct Ram {
    base: u64,
    buffer: Vec<u8>,
    latency: u64,
    mode: ResponseMode,
    /// Cycles left before the outstanding transaction retires.
    pending: Option<u64>,
    /// Reserved address per initiator.
    reservations: HashMap<u64, u64>,
}

impl Ram {
    /// Creates a zero-filled RAM.
    ///
    /// # Arguments
    ///
    /// * `base`    - Physical base address.
    /// * `size`    - Size in bytes.
    /// * `latency` - Latency reported for every access, in cycles.
    /// * `mode`    - Synchronous or asynchronous answers.
    pub fn new(base: u64, size: usize, latency: u64, mode: ResponseMode) -> Self {
        Self {
            base,
            buffer: vec![0; size],
            latency,
            mode,
            pending: None,
            reservations: HashMap::new(),
        }
    }

    /// Creates a RAM from its configuration section.
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.base, config.size, config.latency, config.response)
    }

    /// Returns (`base_address`, `size_in_bytes`).
    pub const fn address_range(&self) -> (u64, u64) {
        (self.base, self.buffer.len() as u64)
    }

    /// Switches between synchronous and asynchronous answers.
    pub const fn set_mode(&mut self, mode: ResponseMode) {
        self.mode = mode;
    }

    /// Changes the latency reported for subsequent accesses.
    pub const fn set_latency(&mut self, latency: u64) {
        self.latency = latency;
    }

    /// Back-door write used to preload contents. Out-of-range data is ignored.
    pub fn load(&mut self, addr: u64, data: &[u8]) {
        if let Some(off) = self.offset(addr, data.len()) {
            self.buffer[off..off + data.len()].copy_from_slice(data);
        }
    }

    /// Back-door read; `None` if the range is not fully mapped.
    pub fn read_bytes(&self, addr: u64, len: usize) -> Option<&[u8]> {
        self.offset(addr, len).map(|off| &self.buffer[off..off + len])
    }

    /// Address currently reserved by `initiator`, if any.
    pub fn reservation(&self, initiator: u64) -> Option<u64> {
        self.reservations.get(&initiator).copied()
    }

    /// Buffer offset of `[addr, addr + len)`, if fully mapped.
    fn offset(&self, addr: u64, len: usize) -> Option<usize> {
        let off = addr.checked_sub(self.base)?;
        let end = off.checked_add(len as u64)?;
        (end <= self.buffer.len() as u64).then_some(off as usize)
    }

    fn read_value(&self, off: usize, size: usize) -> u64 {
        le_value(&self.buffer[off..off + size])
    }

    fn write_value(&mut self, off: usize, size: usize, val: u64) {
        self.buffer[off..off + size].copy_from_slice(&val.to_le_bytes()[..size]);
    }

    /// Any write to a reserved address breaks every reservation on it.
    fn break_reservations(&mut self, addr: u64, size: usize) {
        let end = addr.wrapping_add(size as u64);
        self.reservations.retain(|_, reserved| *reserved < addr || *reserved >= end);
    }

    /// Carries out `req` against the buffer. The range was checked at submission.
    fn perform(&mut self, req: &mut IoReq) {
        let addr = req.addr();
        let size = req.size();
        let off = (addr - self.base) as usize;

        match req.opcode() {
            IoOpcode::Plain if req.is_write() => {
                self.buffer[off..off + size].copy_from_slice(req.data());
                self.break_reservations(addr, size);
            }
            IoOpcode::Plain => {
                req.data_mut().copy_from_slice(&self.buffer[off..off + size]);
            }
            IoOpcode::Atomic(op) => {
                let old = self.read_value(off, size);
                let operand = le_value(req.data());
                let result = match op {
                    AtomicOp::Lr => {
                        let _ = self.reservations.insert(req.initiator(), addr);
                        old
                    }
                    AtomicOp::Sc => {
                        if self.reservation(req.initiator()) == Some(addr) {
                            self.write_value(off, size, operand);
                            self.break_reservations(addr, size);
                            SC_SUCCESS
                        } else {
                            let _ = self.reservations.remove(&req.initiator());
                            SC_FAILURE
                        }
                    }
                    _ => {
                        self.write_value(off, size, amo_alu(op, old, operand, size));
                        self.break_reservations(addr, size);
                        old
                    }
                };
                req.second_data_mut()
                    .copy_from_slice(&result.to_le_bytes()[..size]);
            }
        }
        req.set_latency(self.latency);
    }
}

impl MemoryPort for Ram {
    fn submit(&mut self, req: &mut IoReq) -> IoStatus {
        if self.offset(req.addr(), req.size()).is_none() {
            trace!(target: "ram", addr = req.addr(), size = req.size(), "access outside RAM window");
            return IoStatus::Invalid;
        }

        match self.mode {
            ResponseMode::Sync => {
                self.perform(req);
                IoStatus::Ok
            }
            ResponseMode::Async => {
                if self.pending.is_some() {
                    warn!(target: "ram", addr = req.addr(), "transaction submitted while another is pending");
                    return IoStatus::Invalid;
                }
                self.pending = Some(self.latency.max(1));
                IoStatus::Pending
            }
        }
    }

    fn tick(&mut self, req: &mut IoReq) -> bool {
        let Some(remaining) = self.pending.as_mut() else {
            return false;
        };
        *remaining -= 1;
        if *remaining > 0 {
            return false;
        }
        self.pending = None;
        self.perform(req);
        true
    }
}

impl fmt::Debug for Ram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ram")
            .field("base", &format_args!("{:#x}", self.base))
            .field("size", &self.buffer.len())
            .field("latency", &self.latency)
            .field("mode", &self.mode)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// Little-endian value of up to eight bytes.
fn le_value(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
