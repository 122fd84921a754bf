//! Resume continuations.
//!
//! A continuation is chosen when an access is issued and fired exactly once,
//! when the whole logical access (both halves, if split) has retired. Each
//! one terminates the instruction and applies at most one register fix-up.

use tracing::debug;

use super::{Lsu, LsuContext};
use crate::common::bits::{nan_box, sign_extend};
use crate::common::reg::RegId;

/// Completion handler for an in-flight access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resume {
    /// Plain load: the destination was zeroed before the access, nothing left to do.
    Load,
    /// Signed load: sign-extend `reg` from `size` bytes.
    LoadSigned {
        /// Destination register.
        reg: RegId,
        /// Access width in bytes.
        size: usize,
    },
    /// Floating-point load: NaN-box `reg` from `size` bytes.
    LoadBoxed {
        /// Destination register.
        reg: RegId,
        /// Access width in bytes.
        size: usize,
    },
    /// Store, or an atomic whose result fills the whole register.
    Store,
    /// Exclusive-wait load: wake the core.
    Elw,
    /// Narrow atomic: sign-extend the result register from `size` bytes.
    AtomicSigned {
        /// Result register.
        reg: RegId,
        /// Access width in bytes.
        size: usize,
    },
}

impl Lsu {
    /// Fires and clears the armed continuation.
    pub(super) fn fire_resume(&mut self, ctx: &mut LsuContext<'_>) {
        let Some(resume) = self.resume.take() else {
            debug!(target: "lsu", "Access retired with no continuation armed");
            return;
        };

        ctx.exec.insn_terminate();

        match resume {
            Resume::Load | Resume::Store => {}
            Resume::LoadSigned { reg, size } | Resume::AtomicSigned { reg, size } => {
                let val = ctx.regs.get(reg);
                ctx.regs.set(reg, sign_extend(val, (size * 8) as u32));
            }
            Resume::LoadBoxed { reg, size } => {
                let val = ctx.regs.get(reg);
                ctx.regs.set(reg, nan_box(val, (size * 8) as u32));
            }
            Resume::Elw => {
                // Clear the pending elw so it is not replayed on the next interrupt.
                ctx.exec.set_elw_insn(None);
                self.elw_stalled = false;
                ctx.exec.busy_enter();
            }
        }
    }
}
