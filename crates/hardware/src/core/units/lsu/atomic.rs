//! Atomic accesses.
//!
//! An atomic carries a source register as its operand and a destination
//! register as its result slot. Unlike plain accesses, its address is
//! translated first: load-reserve with read intent, everything else with
//! write intent. A failed translation issues nothing and touches no register.

use tracing::{debug, trace, warn};

use super::{AtomicOp, IoOpcode, IoStatus, Lsu, LsuContext, Resume};
use crate::common::error::LsuError;
use crate::common::reg::{DataSlot, RegId};
use crate::common::{AccessType, VirtAddr};

impl Lsu {
    /// Issues an atomic operation.
    ///
    /// # Arguments
    ///
    /// * `ctx`     - Collaborators for this access.
    /// * `addr`    - Virtual address.
    /// * `size`    - Access width in bytes.
    /// * `reg_in`  - Source register (operand, or store data for `Sc`).
    /// * `reg_out` - Destination register (old memory value, or `Sc` status).
    /// * `op`      - The atomic operation.
    ///
    /// # Returns
    ///
    /// The port's answer. On `Ok` the destination already holds the final,
    /// sign-extended-if-narrow value.
    ///
    /// # Errors
    ///
    /// [`LsuError::Translation`] if the address does not translate; other
    /// [`LsuError`]s for malformed requests or a busy LSU.
    pub fn atomic(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        size: usize,
        reg_in: RegId,
        reg_out: RegId,
        op: AtomicOp,
    ) -> Result<IoStatus, LsuError> {
        debug!(target: "lsu", "Atomic request (addr: {addr:#x}, size: {size:#x}, opcode: {op:?})");

        let src = DataSlot::new(reg_in);
        let dst = DataSlot::new(reg_out);
        self.check(ctx.regs, addr, src, size)?;
        self.check(ctx.regs, addr, dst, size)?;

        let access = if op.is_load_reserve() {
            AccessType::Read
        } else {
            AccessType::Write
        };
        let translation = ctx.mmu.translate(VirtAddr::new(addr), access);
        if let Some(trap) = translation.trap {
            trace!(target: "lsu", "Atomic translation failed: {trap}");
            return Err(LsuError::Translation(trap));
        }
        let paddr = translation.paddr.val();

        self.req.init();
        self.req.set_addr(paddr);
        self.req.set_size(size);
        self.req.set_opcode(IoOpcode::Atomic(op));
        self.req.set_is_write(access.is_write());
        self.req.set_initiator(ctx.hart_id);
        ctx.regs.read_bytes(src, self.req.data_mut());
        self.req.result_slot = Some(dst);

        self.resume = Some(if size < ctx.regs.width(reg_out) {
            Resume::AtomicSigned { reg: reg_out, size }
        } else {
            Resume::Store
        });

        let status = self.submit(ctx);
        match status {
            IoStatus::Ok => self.fire_resume(ctx),
            IoStatus::Invalid => {
                warn!(
                    target: "lsu",
                    "Invalid atomic access (pc: {:#x}, offset: {paddr:#x}, size: {size:#x}, opcode: {})",
                    ctx.exec.current_pc(),
                    self.req.opcode()
                );
                self.resume = None;
            }
            IoStatus::Pending => {}
        }
        Ok(status)
    }
}
