//! Misaligned access handling.
//!
//! An access whose first and last bytes fall in different `XLEN/8`-byte words
//! is split in two. The low half is issued at once; the high half is parked in
//! a [`MisalignedAccess`] record and issued from the held-instruction hook
//! ([`Lsu::exec_misaligned`]) once the low half has been observed complete.
//! The instruction is reported `Pending` to its caller in every case, even
//! when the low half completed synchronously: a split access is never done
//! until both halves have retired.

use tracing::{debug, trace, warn};

use super::{IoStatus, Lsu, LsuContext};
use crate::common::AccessType;
use crate::common::reg::DataSlot;
use crate::config::Xlen;

/// Boundary split of one logical access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    /// Bytes up to the alignment boundary, issued first.
    pub size0: usize,
    /// Address of the second half (the boundary itself).
    pub addr1: u64,
    /// Remaining bytes, issued second.
    pub size1: usize,
}

/// Computes the split of `[addr, addr + size)` at the `xlen` word boundary.
///
/// # Returns
///
/// `None` if the first and last bytes lie in the same aligned word.
pub const fn split(addr: u64, size: usize, xlen: Xlen) -> Option<Split> {
    if size <= 1 {
        return None;
    }
    let mask = xlen.addr_mask();
    let addr0 = addr & mask;
    let addr1 = addr.wrapping_add(size as u64 - 1) & mask;
    if addr0 == addr1 {
        return None;
    }
    let size0 = addr1.wrapping_sub(addr) as usize;
    Some(Split {
        size0,
        addr1,
        size1: size - size0,
    })
}

/// Checks whether an access stays inside one aligned word.
pub const fn is_aligned(addr: u64, size: usize, xlen: Xlen) -> bool {
    split(addr, size, xlen).is_none()
}

/// State kept between the two halves of a split access.
///
/// Present exactly while the LSU is between issuing the first half and
/// issuing the second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MisalignedAccess {
    /// Bytes left to transfer.
    pub size: usize,
    /// Register slot of the second half (first-half slot advanced by its size).
    pub slot: DataSlot,
    /// Address of the second half.
    pub addr: u64,
    /// Direction.
    pub is_write: bool,
}

impl Lsu {
    /// Issues the first half of a split access and arms the second.
    pub(super) fn data_misaligned_req(
        &mut self,
        ctx: &mut LsuContext<'_>,
        addr: u64,
        slot: DataSlot,
        size: usize,
        is_write: bool,
        split: Split,
    ) -> IoStatus {
        debug!(target: "lsu", "Misaligned data request (addr: {addr:#x}, size: {size:#x}, is_write: {is_write})");

        ctx.timing.charge_misaligned_event(1);

        self.misaligned = Some(MisalignedAccess {
            size: split.size1,
            slot: slot.advance(split.size0),
            addr: split.addr1,
            is_write,
        });

        match self.data_req_aligned(ctx, addr, slot, split.size0, is_write) {
            IoStatus::Invalid => {
                warn!(
                    target: "lsu",
                    "Misaligned {} access aborted on first half (pc: {:#x}, offset: {addr:#x}, size: {size:#x})",
                    AccessType::from_is_write(is_write),
                    ctx.exec.current_pc()
                );
                self.misaligned = None;
                self.resume = None;
                IoStatus::Invalid
            }
            IoStatus::Ok | IoStatus::Pending => {
                // The instruction can only retire once both halves are done.
                ctx.exec.insn_hold();
                IoStatus::Pending
            }
        }
    }

    /// Held-instruction hook: issues the second half of a split access.
    ///
    /// Charges the extra bus access, then issues the recorded half. A
    /// synchronous completion returns execution to full-detail mode and fires
    /// the armed continuation; a pending one does both from
    /// [`Lsu::on_response`]. A rejected second half is reported and dropped.
    pub fn exec_misaligned(&mut self, ctx: &mut LsuContext<'_>) {
        let Some(access) = self.misaligned.take() else {
            debug!(target: "lsu", "Held-instruction hook without a pending split access");
            return;
        };

        trace!(target: "lsu", "Handling second half of misaligned access");

        ctx.timing.charge_load_event(1);
        ctx.timing.advance_cycle();

        match self.data_req_aligned(ctx, access.addr, access.slot, access.size, access.is_write) {
            IoStatus::Ok => {
                ctx.exec.switch_to_full_mode();
                self.fire_resume(ctx);
            }
            IoStatus::Pending => self.second_half_in_flight = true,
            IoStatus::Invalid => {
                warn!(
                    target: "lsu",
                    "Misaligned {} access failed on second half (pc: {:#x}, offset: {:#x}, size: {:#x})",
                    AccessType::from_is_write(access.is_write),
                    ctx.exec.current_pc(),
                    access.addr,
                    access.size
                );
                self.resume = None;
            }
        }
    }
}
