//! Address translation for atomic accesses.
//!
//! The LSU only relies on the pass/fail contract of [`Translate`]: a failed
//! translation means "do not issue the transaction", and delivering the trap
//! is the caller's business. [`Mmu`] is the reference translator: bare
//! (identity) when no windows are configured, otherwise a first-match search
//! over contiguous mapped windows with read/write permissions.

use crate::common::{AccessType, PhysAddr, TranslationResult, Trap, VirtAddr};
use crate::config::{MmuConfig, MmuWindow};

/// Virtual-to-physical translation contract.
pub trait Translate {
    /// Translates `vaddr` for an access of the given intent.
    ///
    /// A result carrying a trap means the access must not be issued.
    fn translate(&mut self, vaddr: VirtAddr, access: AccessType) -> TranslationResult;
}

/// Window-mapped translator.
#[derive(Clone, Debug, Default)]
pub struct Mmu {
    windows: Vec<MmuWindow>,
}

impl Mmu {
    /// Creates a bare translator (identity mapping, no faults).
    pub const fn bare() -> Self {
        Self {
            windows: Vec::new(),
        }
    }

    /// Creates a translator from its configuration section.
    pub fn from_config(config: &MmuConfig) -> Self {
        Self {
            windows: config.windows.clone(),
        }
    }

    /// Adds a window; earlier windows win on overlap.
    pub fn map(&mut self, window: MmuWindow) {
        self.windows.push(window);
    }

    /// Returns `true` while no window is configured.
    pub const fn is_bare(&self) -> bool {
        self.windows.is_empty()
    }
}

impl Translate for Mmu {
    fn translate(&mut self, vaddr: VirtAddr, access: AccessType) -> TranslationResult {
        let va = vaddr.val();
        if self.is_bare() {
            return TranslationResult::success(PhysAddr::new(va), 0);
        }

        let Some(window) = self.windows.iter().find(|w| w.contains(va)) else {
            return TranslationResult::fault(page_fault(va, access), 0);
        };

        let allowed = match access {
            AccessType::Read => window.read,
            AccessType::Write => window.write,
        };
        if !allowed {
            return TranslationResult::fault(access_fault(va, access), 0);
        }

        TranslationResult::success(PhysAddr::new(window.pbase + (va - window.vbase)), 0)
    }
}

/// Page fault for an address no window covers.
const fn page_fault(addr: u64, access: AccessType) -> Trap {
    match access {
        AccessType::Read => Trap::LoadPageFault(addr),
        AccessType::Write => Trap::StorePageFault(addr),
    }
}

/// Access fault for a window lacking the needed permission.
const fn access_fault(addr: u64, access: AccessType) -> Trap {
    match access {
        AccessType::Read => Trap::LoadAccessFault(addr),
        AccessType::Write => Trap::StoreAccessFault(addr),
    }
}
