//! Memory Access Types.
//!
//! Classifies data accesses for the two places that care about intent:
//! 1. **Translation:** Load-reserve translates for reading, every other atomic for writing.
//! 2. **Diagnostics:** Invalid-access warnings report the direction of the failed access.

use std::fmt;

/// Type of data access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data read access.
    ///
    /// Loads, load-reserve and exclusive-wait loads. Requires Read permission.
    Read,

    /// Data write access.
    ///
    /// Stores and every read-modify-write atomic. Requires Write permission.
    Write,
}

impl AccessType {
    /// Maps a bus direction flag onto an access type.
    #[inline]
    pub const fn from_is_write(is_write: bool) -> Self {
        if is_write { Self::Write } else { Self::Read }
    }

    /// Returns `true` for [`AccessType::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}
