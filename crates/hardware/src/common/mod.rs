//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by the LSU, its collaborators
//! and the memory targets. It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Memory Access:** Read/Write intent used by translation and diagnostics.
//! 3. **Bit Helpers:** Sign extension and NaN-boxing from an access width.
//! 4. **Error Handling:** Trap representations, translation results and LSU errors.
//! 5. **Register Management:** Register identifiers, data slots and the unified file.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Width-dependent value transforms.
pub mod bits;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use addr::{PhysAddr, VirtAddr};
pub use data::AccessType;
pub use error::{ConfigError, LsuError, TranslationResult, Trap};
pub use reg::{DataSlot, RegId, RegisterFile};
