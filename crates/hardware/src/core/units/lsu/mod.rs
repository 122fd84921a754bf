//! Load/Store Unit (LSU).
//!
//! This module turns an instruction's logical memory access into physical bus
//! transactions and resumes the instruction once the access has retired. It
//! includes:
//! - [`request`]: The reusable bus transaction and its status vocabulary.
//! - [`unaligned`]: Boundary splitting and the second-half hook.
//! - [`resume`]: The closed set of completion continuations.
//! - [`atomic`]: Translated read-modify-write accesses.
//!
//! The simulated core is scalar and in-order, so one LSU has at most one
//! transaction in flight and at most one split access between halves. A new
//! access is refused with [`LsuError::Busy`] until both have cleared.
//!
//! # Protocol
//!
//! Every entry point arms its continuation, then submits. The port's answer
//! decides what happens next:
//! - `Ok`: data is copied into the register file, latency (if any) is charged
//!   and, for an unsplit access, the continuation fires immediately.
//! - `Pending`: the instruction is stalled; [`Lsu::on_response`] finishes it.
//! - `Invalid`: a warning is emitted, the continuation is disarmed and the
//!   caller owns any fault semantics.

/// Atomic (translated read-modify-write) accesses.
pub mod atomic;

/// Reusable bus transaction.
pub mod request;

/// Completion continuations.
pub mod resume;

/// Misaligned access splitting.
pub mod unaligned;

use std::fmt;

use tracing::{debug, trace, warn};

pub use self::request::{AtomicOp, IoOpcode, IoReq, IoStatus, MAX_ACCESS_SIZE, ReqState};
pub use self::resume::Resume;
pub use self::unaligned::MisalignedAccess;

use crate::common::AccessType;
use crate::common::error::LsuError;
use crate::common::reg::{DataSlot, RegId, RegisterFile};
use crate::config::Xlen;
use crate::core::cpu::execution::ExecControl;
use crate::core::units::mmu::Translate;
use crate::soc::traits::MemoryPort;
use crate::stats::TimingTracker;

/// Collaborators the LSU drives while handling one access.
///
/// Borrowed for the duration of a call; the LSU owns none of them.
pub struct LsuContext<'a> {
    /// Downstream memory port.
    pub port: &'a mut dyn MemoryPort,
    /// Address translator for atomics.
    pub mmu: &'a mut dyn Translate,
    /// Instruction lifecycle control.
    pub exec: &'a mut dyn ExecControl,
    /// Timing accounting.
    pub timing: &'a mut dyn TimingTracker,
    /// Register file (load destinations, store sources).
    pub regs: &'a mut RegisterFile,
    /// Hart identifier stamped on atomic transactions.
    pub hart_id: u64,
}

impl fmt::Debug for LsuContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LsuContext")
            .field("hart_id", &self.hart_id)
            .finish_non_exhaustive()
    }
}

/// Load/Store Unit of one hart.
#[derive(Clone, Debug)]
pub struct Lsu {
    xlen: Xlen,
    req: IoReq,
    misaligned: Option<MisalignedAccess>,
    resume: Option<Resume>,
    elw_stalled: bool,
    /// The in-flight transaction is the second half of a split access.
    second_half_in_flight: bool,
}

impl Lsu {
    /// Creates an idle LSU for a hart of the given register width.
    pub fn new(xlen: Xlen) -> Self {
        Self {
            xlen,
            req: IoReq::new(),
            misaligned: None,
            resume: None,
            elw_stalled: false,
            second_half_in_flight: false,
        }
    }

    /// Register width, which also fixes the alignment boundary.
    pub const fn xlen(&self) -> Xlen {
        self.xlen
    }

    /// Returns `true` while an exclusive-wait load is blocked.
    pub const fn elw_stalled(&self) -> bool {
        self.elw_stalled
    }

    /// Second half of a split access awaiting issue, if any.
    pub const fn misaligned(&self) -> Option<&MisalignedAccess> {
        self.misaligned.as_ref()
    }

    /// Continuation armed for the access in progress, if any.
    pub const fn armed_resume(&self) -> Option<Resume> {
        self.resume
    }

    /// The reusable transaction.
    pub const fn request(&self) -> &IoReq {
        &self.req
    }

    /// Mutable access to the transaction, for the port to retire it in place.
    pub const fn request_mut(&mut self) -> &mut IoReq {
        &mut self.req
    }

    /// Returns `true` while the port owes a response.
    pub const fn is_in_flight(&self) -> bool {
        self.req.is_in_flight()
    }

    /// Returns `true` while a new access would be refused.
    pub const fn is_busy(&self) -> bool {
        self.req.is_in_flight() || self.misaligned.is_some()
    }

    /// Reset signal. When asserted, clears the exclusive-wait latch and drops
    /// any split-access bookkeeping without draining it.
    ///
    /// A split access whose second half is dropped can never retire, so its
    /// continuation is disarmed with it. The hold it placed on the instruction
    /// stays until the next held-instruction hook, which finds no record and
    /// does nothing. An in-flight transaction is left for the port to retire.
    pub fn reset(&mut self, active: bool) {
        if active {
            self.elw_stalled = false;
            if self.misaligned.take().is_some() {
                self.resume = None;
            }
        }
    }

    /// Loads `size` bytes into `reg`, zero-extended.
    ///
    /// # Errors
    ///
    /// Returns an [`LsuError`] if the request is malformed or the LSU is busy;
    /// the register is left untouched in that case.
    pub fn load(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        self.load_with(ctx, addr, size, reg, Resume::Load)
    }

    /// Loads `size` bytes into `reg`, sign-extended to the register width.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn load_signed(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        self.load_with(ctx, addr, size, reg, Resume::LoadSigned { reg, size })
    }

    /// Loads `size` bytes into a floating-point `reg`, NaN-boxed.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn load_boxed(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        self.load_with(ctx, addr, size, reg, Resume::LoadBoxed { reg, size })
    }

    /// Stores the low `size` bytes of `reg`.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn store(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        self.issue(ctx, addr, DataSlot::new(reg), size, true, Resume::Store)
    }

    /// Exclusive-wait load: a load that parks the core until its response.
    ///
    /// On `Pending` the exclusive-wait latch is set and the instruction is
    /// recorded with execution control; the elw continuation undoes both.
    ///
    /// # Errors
    ///
    /// See [`Lsu::load`].
    pub fn elw(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg: RegId,
    ) -> Result<IoStatus, LsuError> {
        let status = self.load_with(ctx, addr, size, reg, Resume::Elw)?;
        if status == IoStatus::Pending {
            let pc = ctx.exec.current_pc();
            ctx.exec.set_elw_insn(Some(pc));
            self.elw_stalled = true;
        }
        Ok(status)
    }

    fn load_with(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg: RegId,
        resume: Resume,
    ) -> Result<IoStatus, LsuError> {
        let slot = DataSlot::new(reg);
        self.check(ctx.regs, addr, slot, size)?;
        // Zero-extension happens here; the transaction only fills the low bytes.
        ctx.regs.set(reg, 0);
        self.issue(ctx, addr, slot, size, false, resume)
    }

    /// Issues a logical access, splitting it if it crosses the word boundary.
    ///
    /// `resume` is armed before anything is submitted and fires exactly once
    /// when the whole access has retired.
    ///
    /// # Returns
    ///
    /// `Ok` if the access completed synchronously, `Pending` if it will
    /// complete later (always the case for a split access), `Invalid` if the
    /// port rejected it.
    ///
    /// # Errors
    ///
    /// Returns an [`LsuError`] if the request is malformed or the LSU is busy.
    pub fn issue(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        slot: DataSlot,
        size: usize,
        is_write: bool,
        resume: Resume,
    ) -> Result<IoStatus, LsuError> {
        self.check(ctx.regs, addr, slot, size)?;
        self.resume = Some(resume);

        let status = match unaligned::split(addr, size, self.xlen) {
            None => {
                let status = self.data_req_aligned(ctx, addr, slot, size, is_write);
                match status {
                    IoStatus::Ok => self.fire_resume(ctx),
                    IoStatus::Invalid => self.resume = None,
                    IoStatus::Pending => {}
                }
                status
            }
            Some(split) => self.data_misaligned_req(ctx, addr, slot, size, is_write, split),
        };
        Ok(status)
    }

    /// Response notification for a `Pending` transaction.
    ///
    /// Releases the stall, copies the data back, charges the realized latency
    /// and fires the continuation unless this was the first half of a split
    /// access, whose second half is issued from the held-instruction hook.
    /// A retiring second half also returns execution to full-detail mode.
    pub fn on_response(&mut self, ctx: &mut LsuContext<'_>) {
        if !self.req.is_in_flight() {
            debug!(target: "lsu", "Response without an outstanding transaction");
            return;
        }

        ctx.exec.stalled_dec();

        debug!(target: "lsu", "Received data response (latency: {})", self.req.latency());

        self.retire_request(ctx);
        ctx.timing.charge_load_latency(self.req.latency());

        if self.misaligned.is_none() {
            if std::mem::take(&mut self.second_half_in_flight) {
                ctx.exec.switch_to_full_mode();
            }
            self.fire_resume(ctx);
        }
    }

    /// Builds and submits one transaction that does not cross the boundary.
    pub(crate) fn data_req_aligned(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        slot: DataSlot,
        size: usize,
        is_write: bool,
    ) -> IoStatus {
        debug!(target: "lsu", "Data request (addr: {addr:#x}, size: {size:#x}, is_write: {is_write})");

        self.req.init();
        self.req.set_addr(addr);
        self.req.set_size(size);
        self.req.set_is_write(is_write);
        self.req.set_initiator(ctx.hart_id);
        if is_write {
            ctx.regs.read_bytes(slot, self.req.data_mut());
        } else {
            self.req.slot = Some(slot);
        }

        let status = self.submit(ctx);
        if status == IoStatus::Invalid {
            warn!(
                target: "lsu",
                "Invalid {} access (pc: {:#x}, offset: {addr:#x}, size: {size:#x})",
                AccessType::from_is_write(is_write),
                ctx.exec.current_pc()
            );
        }
        status
    }

    /// Submits the prepared transaction and handles the immediate answer.
    fn submit(&mut self, ctx: &mut LsuContext<'_>) -> IoStatus {
        let status = ctx.port.submit(&mut self.req);
        match status {
            IoStatus::Ok => {
                self.retire_request(ctx);
                if self.req.latency() > 0 {
                    ctx.timing.charge_load_latency(self.req.latency());
                }
            }
            IoStatus::Invalid => self.req.set_state(ReqState::Idle),
            IoStatus::Pending => {
                trace!(target: "lsu", "Waiting for asynchronous response");
                self.req.set_state(ReqState::InFlight);
                ctx.exec.insn_stall();
            }
        }
        status
    }

    /// Copies returned data into the register slots recorded at issue time.
    fn retire_request(&mut self, ctx: &mut LsuContext<'_>) {
        if let Some(slot) = self.req.slot {
            ctx.regs.write_bytes(slot, self.req.data());
        }
        if let Some(slot) = self.req.result_slot {
            ctx.regs.write_bytes(slot, self.req.second_data());
        }
        self.req.set_state(ReqState::Retired);
    }

    /// Refuses malformed requests and requests made while busy.
    fn check(
        &self,
        regs: &RegisterFile,
        addr: u64,
        slot: DataSlot,
        size: usize,
    ) -> Result<(), LsuError> {
        if self.is_busy() {
            return Err(LsuError::Busy);
        }
        if size == 0 {
            return Err(LsuError::ZeroSize { addr });
        }
        if size > MAX_ACCESS_SIZE {
            return Err(LsuError::TooLarge {
                size,
                max: MAX_ACCESS_SIZE,
            });
        }
        let width = regs.width(slot.reg);
        if slot.offset + size > width {
            return Err(LsuError::SlotOverflow {
                offset: slot.offset,
                size,
                width,
            });
        }
        Ok(())
    }
}
