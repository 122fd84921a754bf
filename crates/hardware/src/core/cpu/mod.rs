//! Hart Driver.
//!
//! This module defines the `Iss` structure, the container for one simulated
//! hart's memory-access state. It coordinates the following:
//! 1. **Ownership:** The LSU plus every collaborator it borrows per call
//!    (register file, execution control, timing, memory port, translator).
//! 2. **Instruction Entry Points:** Loads, stores, exclusive-wait loads and
//!    atomics as an instruction handler would issue them.
//! 3. **Event Delivery:** One `cycle()` ticks the port for an outstanding
//!    transaction and forwards its retirement, or fires the held-instruction
//!    hook once all stalls have drained. Nothing is polled by the LSU itself.

/// Instruction lifecycle control.
pub mod execution;

use self::execution::Exec;
use crate::common::error::LsuError;
use crate::common::reg::{RegId, RegisterFile};
use crate::config::Config;
use crate::core::units::lsu::{AtomicOp, IoStatus, Lsu, LsuContext};
use crate::core::units::mmu::{Mmu, Translate};
use crate::soc::memory::Ram;
use crate::soc::traits::MemoryPort;
use crate::stats::Timing;

/// One simulated hart's load/store machinery.
#[derive(Debug)]
pub struct Iss<P = Ram, T = Mmu> {
    /// Load/Store Unit.
    pub lsu: Lsu,
    /// General Purpose and Floating Point Registers.
    pub regs: RegisterFile,
    /// Instruction lifecycle state.
    pub exec: Exec,
    /// Timing counters.
    pub timing: Timing,
    /// Data memory port.
    pub port: P,
    /// Address translator used by atomics.
    pub mmu: T,
    hart_id: u64,
    cycles: u64,
}

impl Iss {
    /// Builds a hart with a RAM port and window translator from `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config,
            Ram::from_config(&config.memory),
            Mmu::from_config(&config.mmu),
        )
    }
}

impl<P: MemoryPort, T: Translate> Iss<P, T> {
    /// Builds a hart around an arbitrary port and translator.
    pub fn with_parts(config: &Config, port: P, mmu: T) -> Self {
        Self {
            lsu: Lsu::new(config.general.xlen),
            regs: RegisterFile::new(config.general.xlen),
            exec: Exec::new(),
            timing: Timing::new(),
            port,
            mmu,
            hart_id: config.general.hart_id,
            cycles: 0,
        }
    }

    /// Hart identifier stamped on atomic transactions.
    pub const fn hart_id(&self) -> u64 {
        self.hart_id
    }

    /// Cycles simulated by [`Iss::cycle`].
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Sets the program counter reported in diagnostics.
    pub const fn set_pc(&mut self, pc: u64) {
        self.exec.set_pc(pc);
    }

    /// Splits the hart into the LSU and the context it drives.
    pub fn lsu_context(&mut self) -> (&mut Lsu, LsuContext<'_>) {
        let Self {
            lsu,
            regs,
            exec,
            timing,
            port,
            mmu,
            hart_id,
            ..
        } = self;
        (
            lsu,
            LsuContext {
                port,
                mmu,
                exec,
                timing,
                regs,
                hart_id: *hart_id,
            },
        )
    }

    /// Zero-extending load into `reg`.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn load(&mut self, addr: u64, size: usize, reg: RegId) -> Result<IoStatus, LsuError> {
        let (lsu, mut ctx) = self.lsu_context();
        lsu.load(&mut ctx, addr, size, reg)
    }

    /// Sign-extending load into `reg`.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn load_signed(
        &mut self,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        let (lsu, mut ctx) = self.lsu_context();
        lsu.load_signed(&mut ctx, addr, size, reg)
    }

    /// NaN-boxing load into a floating-point `reg`.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn load_boxed(
        &mut self,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        let (lsu, mut ctx) = self.lsu_context();
        lsu.load_boxed(&mut ctx, addr, size, reg)
    }

    /// Store of the low `size` bytes of `reg`.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn store(&mut self, addr: u64, size: usize, reg: RegId) -> Result<IoStatus, LsuError> {
        let (lsu, mut ctx) = self.lsu_context();
        lsu.store(&mut ctx, addr, size, reg)
    }

    /// Exclusive-wait load; the core leaves the busy state while it waits.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn elw(&mut self, addr: u64, size: usize, reg: RegId) -> Result<IoStatus, LsuError> {
        let (lsu, mut ctx) = self.lsu_context();
        let status = lsu.elw(&mut ctx, addr, size, reg)?;
        if status == IoStatus::Pending {
            self.exec.busy_leave();
        }
        Ok(status)
    }

    /// Atomic operation from `reg_in` into `reg_out`.
    ///
    /// # Errors
    ///
    /// See [`Lsu::atomic`].
    pub fn atomic(
        &mut self,
        addr: u64,
        size: usize,
        reg_in: RegId,
        reg_out: RegId,
        op: AtomicOp,
    ) -> Result<IoStatus, LsuError> {
        let (lsu, mut ctx) = self.lsu_context();
        lsu.atomic(&mut ctx, addr, size, reg_in, reg_out, op)
    }

    /// Simulates one cycle.
    ///
    /// An outstanding transaction gets one port tick, and its retirement is
    /// forwarded to [`Lsu::on_response`]. Otherwise a held instruction with no
    /// outstanding stall runs its hook, issuing the second half of a split
    /// access.
    pub fn cycle(&mut self) {
        self.cycles += 1;

        if self.lsu.is_in_flight() {
            if self.port.tick(self.lsu.request_mut()) {
                let (lsu, mut ctx) = self.lsu_context();
                lsu.on_response(&mut ctx);
            }
            return;
        }

        if self.exec.take_hold() {
            let (lsu, mut ctx) = self.lsu_context();
            lsu.exec_misaligned(&mut ctx);
        }
    }

    /// Cycles until the current instruction can retire, at most `max_cycles`.
    ///
    /// # Returns
    ///
    /// The number of cycles simulated.
    pub fn run_until_idle(&mut self, max_cycles: u64) -> u64 {
        let mut n = 0;
        while n < max_cycles && (self.lsu.is_busy() || self.exec.is_blocked()) {
            self.cycle();
            n += 1;
        }
        n
    }

    /// Reset signal, forwarded to the LSU.
    pub fn reset(&mut self, active: bool) {
        self.lsu.reset(active);
    }
}
