//! Trap, Translation Result and LSU error definitions.
//!
//! This module defines the error handling vocabulary of the core. It provides:
//! 1. **Trap Representation:** The synchronous faults an address translator can raise.
//! 2. **Translation Results:** The outcome of a virtual-to-physical translation.
//! 3. **LSU Errors:** Caller contract violations, distinct from bus outcomes.
//! 4. **Config Errors:** Failures while loading a JSON configuration.
//!
//! Bus outcomes (`Ok`/`Pending`/`Invalid`) are not errors and live in
//! [`crate::core::units::lsu::IoStatus`].

use std::fmt;

use thiserror::Error;

use super::addr::PhysAddr;

/// Synchronous traps raised by address translation.
///
/// Delivery of these traps is the translator's business; the LSU only
/// refuses to issue the access and hands the trap back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Load access fault: the target window forbids reading.
    LoadAccessFault(u64),

    /// Store/AMO access fault: the target window forbids writing.
    StoreAccessFault(u64),

    /// Load page fault: no mapping covers the address.
    LoadPageFault(u64),

    /// Store/AMO page fault: no mapping covers the address.
    StorePageFault(u64),
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Self::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr:#x})"),
            Self::LoadPageFault(addr) => write!(f, "LoadPageFault({addr:#x})"),
            Self::StorePageFault(addr) => write!(f, "StorePageFault({addr:#x})"),
        }
    }
}

impl std::error::Error for Trap {}

/// Result of a virtual-to-physical address translation operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationResult {
    /// The translated physical address, or zero if translation failed.
    pub paddr: PhysAddr,
    /// Number of cycles consumed by the translation operation.
    pub cycles: u64,
    /// Trap that occurred during translation, if any.
    pub trap: Option<Trap>,
}

impl TranslationResult {
    /// Creates a successful translation result.
    ///
    /// # Arguments
    ///
    /// * `paddr` - The successfully translated physical address.
    /// * `cycles` - Number of cycles consumed by the translation.
    #[inline]
    pub const fn success(paddr: PhysAddr, cycles: u64) -> Self {
        Self {
            paddr,
            cycles,
            trap: None,
        }
    }

    /// Creates a translation result indicating a fault occurred.
    ///
    /// # Arguments
    ///
    /// * `trap` - The trap that occurred during translation.
    /// * `cycles` - Number of cycles consumed before the fault.
    #[inline]
    pub const fn fault(trap: Trap, cycles: u64) -> Self {
        Self {
            paddr: PhysAddr(0),
            cycles,
            trap: Some(trap),
        }
    }

    /// Returns `true` when no trap was raised.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        self.trap.is_none()
    }
}

/// Requests the LSU refuses before anything reaches the memory port.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LsuError {
    /// Zero-byte access.
    #[error("zero-sized access at {addr:#x}")]
    ZeroSize {
        /// Address of the refused access.
        addr: u64,
    },

    /// Access wider than a transaction buffer.
    #[error("access of {size} bytes exceeds the {max}-byte transaction buffer")]
    TooLarge {
        /// Requested size in bytes.
        size: usize,
        /// Largest supported size in bytes.
        max: usize,
    },

    /// Data slot runs past the end of its register.
    #[error("{size}-byte slot at offset {offset} overflows a {width}-byte register")]
    SlotOverflow {
        /// Byte offset of the slot inside the register.
        offset: usize,
        /// Requested size in bytes.
        size: usize,
        /// Register width in bytes.
        width: usize,
    },

    /// A transaction or split access is still outstanding.
    #[error("load-store unit busy: previous access has not retired")]
    Busy,

    /// Atomic address translation failed; no transaction was issued.
    #[error("atomic translation failed: {0}")]
    Translation(Trap),
}

/// Failures while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    /// The contents are not a valid configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
