//! Instruction lifecycle control.
//!
//! The LSU never retires instructions itself; it asks execution control to
//! stall, hold or terminate the current instruction. This module provides:
//! 1. **Contract:** The `ExecControl` trait the LSU calls into.
//! 2. **Reference State Machine:** `Exec`, which records the lifecycle state
//!    the `Iss` driver consults to deliver held-instruction resumes.
//!
//! Stalling and holding are distinct. A stall counts an outstanding memory
//! response and is undone by `stalled_dec`. A hold parks the instruction
//! until a dedicated resume hook runs (the second half of a split access),
//! and only fires once no stall is outstanding.

/// Execution-control primitives consumed by the LSU.
pub trait ExecControl {
    /// Suspends retirement until a memory response arrives.
    fn insn_stall(&mut self);

    /// Undoes one `insn_stall` on response arrival.
    fn stalled_dec(&mut self);

    /// Parks the instruction until its held-instruction hook runs.
    fn insn_hold(&mut self);

    /// Retires the current instruction.
    fn insn_terminate(&mut self);

    /// Re-enters the busy (running) state.
    fn busy_enter(&mut self);

    /// Returns the simulated execution to full-detail mode.
    fn switch_to_full_mode(&mut self);

    /// Program counter of the current instruction, for diagnostics.
    fn current_pc(&self) -> u64;

    /// Records (or clears) the exclusive-wait instruction to replay on wake-up.
    fn set_elw_insn(&mut self, pc: Option<u64>);
}

/// Reference execution control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exec {
    pc: u64,
    stalled: u32,
    held: bool,
    full_mode: bool,
    busy: bool,
    retired: u64,
    elw_insn: Option<u64>,
}

impl Default for Exec {
    fn default() -> Self {
        Self::new()
    }
}

impl Exec {
    /// Creates a running, unstalled execution context.
    pub const fn new() -> Self {
        Self {
            pc: 0,
            stalled: 0,
            held: false,
            full_mode: true,
            busy: true,
            retired: 0,
            elw_insn: None,
        }
    }

    /// Sets the program counter of the instruction about to execute.
    pub const fn set_pc(&mut self, pc: u64) {
        self.pc = pc;
    }

    /// Number of outstanding stalls.
    pub const fn stalled(&self) -> u32 {
        self.stalled
    }

    /// Returns `true` while the instruction is parked on its hook.
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Returns `true` in full-detail mode.
    pub const fn is_full_mode(&self) -> bool {
        self.full_mode
    }

    /// Returns `true` while the core is busy (not sleeping on an exclusive wait).
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Leaves the busy state; the core sleeps until `busy_enter`.
    pub const fn busy_leave(&mut self) {
        self.busy = false;
    }

    /// Number of instructions retired so far.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// Pending exclusive-wait instruction, if any.
    pub const fn elw_insn(&self) -> Option<u64> {
        self.elw_insn
    }

    /// Returns `true` while the instruction can neither retire nor advance.
    pub const fn is_blocked(&self) -> bool {
        self.held || self.stalled > 0
    }

    /// Consumes a hold whose stalls have all drained.
    ///
    /// Returns `true` exactly once per hold; the caller must then run the
    /// held-instruction hook.
    pub const fn take_hold(&mut self) -> bool {
        if self.held && self.stalled == 0 {
            self.held = false;
            true
        } else {
            false
        }
    }
}

impl ExecControl for Exec {
    fn insn_stall(&mut self) {
        self.stalled += 1;
    }

    fn stalled_dec(&mut self) {
        self.stalled = self.stalled.saturating_sub(1);
    }

    fn insn_hold(&mut self) {
        self.held = true;
        self.full_mode = false;
    }

    fn insn_terminate(&mut self) {
        self.retired += 1;
    }

    fn busy_enter(&mut self) {
        self.busy = true;
    }

    fn switch_to_full_mode(&mut self) {
        self.full_mode = true;
        self.held = false;
    }

    fn current_pc(&self) -> u64 {
        self.pc
    }

    fn set_elw_insn(&mut self, pc: Option<u64>) {
        self.elw_insn = pc;
    }
}
