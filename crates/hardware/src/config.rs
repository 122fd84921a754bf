//! Configuration system for the simulator core.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the hart. It provides:
//! 1. **Defaults:** Baseline constants (register width, RAM window, latency).
//! 2. **Structures:** Hierarchical config for general, memory and MMU settings.
//! 3. **Enums:** Register width and memory response mode.
//!
//! Configuration is supplied as JSON (`Config::from_json`, `Config::from_file`) or
//! built with `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Base address of the L2 RAM window.
    pub const RAM_BASE: u64 = 0x1C00_0000;

    /// Size of the RAM window (1 MiB).
    pub const RAM_SIZE: usize = 1024 * 1024;

    /// Access latency reported by the RAM in cycles.
    pub const RAM_LATENCY: u64 = 0;

    /// Hart identifier stamped on atomic transactions.
    pub const HART_ID: u64 = 0;
}

/// Integer register width of the simulated hart.
///
/// Also fixes the natural alignment boundary: an access is split when its
/// first and last bytes fall in different `XLEN/8`-byte words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Xlen {
    /// 32-bit registers, 4-byte alignment boundary.
    #[default]
    #[serde(alias = "Rv32", alias = "rv32")]
    Rv32,
    /// 64-bit registers, 8-byte alignment boundary.
    #[serde(alias = "Rv64", alias = "rv64")]
    Rv64,
}

impl Xlen {
    /// Register width in bytes.
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Rv32 => 4,
            Self::Rv64 => 8,
        }
    }

    /// Mask selecting the aligned word containing an address.
    #[inline]
    pub const fn addr_mask(self) -> u64 {
        !(self.bytes() as u64 - 1)
    }

    /// Truncates `val` to the register width.
    #[inline]
    pub const fn mask(self, val: u64) -> u64 {
        match self {
            Self::Rv32 => val & 0xFFFF_FFFF,
            Self::Rv64 => val,
        }
    }
}

/// How the RAM target answers a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ResponseMode {
    /// Performs the access inside `submit` and answers `Ok`.
    #[default]
    Sync,
    /// Answers `Pending` and retires the access on a later port tick.
    Async,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use iss_core::config::{Config, ResponseMode, Xlen};
///
/// let json = r#"{ "general": { "xlen": "RV64" }, "memory": { "response": "Async", "latency": 3 } }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.xlen, Xlen::Rv64);
/// assert_eq!(config.memory.response, ResponseMode::Async);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Hart-level settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// RAM target settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Address translation settings.
    #[serde(default)]
    pub mmu: MmuConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Hart-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Integer register width.
    #[serde(default)]
    pub xlen: Xlen,

    /// Identifier stamped as initiator on atomic transactions.
    #[serde(default = "GeneralConfig::default_hart_id")]
    pub hart_id: u64,
}

impl GeneralConfig {
    /// Returns the default hart identifier.
    const fn default_hart_id() -> u64 {
        defaults::HART_ID
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            xlen: Xlen::default(),
            hart_id: defaults::HART_ID,
        }
    }
}

/// RAM target settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Physical base address of the RAM window.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u64,

    /// Size of the RAM window in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,

    /// Latency in cycles reported for every access.
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,

    /// Synchronous or asynchronous answers.
    #[serde(default)]
    pub response: ResponseMode,
}

impl MemoryConfig {
    /// Returns the default RAM base address.
    const fn default_base() -> u64 {
        defaults::RAM_BASE
    }

    /// Returns the default RAM size.
    const fn default_size() -> usize {
        defaults::RAM_SIZE
    }

    /// Returns the default RAM latency.
    const fn default_latency() -> u64 {
        defaults::RAM_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::RAM_BASE,
            size: defaults::RAM_SIZE,
            latency: defaults::RAM_LATENCY,
            response: ResponseMode::default(),
        }
    }
}

/// Address translation settings.
///
/// With no windows the translator runs bare: every virtual address maps to
/// the same physical address with full permissions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MmuConfig {
    /// Mapped windows, searched in order.
    #[serde(default)]
    pub windows: Vec<MmuWindow>,
}

/// One contiguous virtual-to-physical mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MmuWindow {
    /// First virtual address covered.
    pub vbase: u64,
    /// Physical address `vbase` maps to.
    pub pbase: u64,
    /// Window size in bytes.
    pub size: u64,
    /// Reads (and load-reserve) allowed.
    #[serde(default = "MmuWindow::default_permission")]
    pub read: bool,
    /// Writes (and read-modify-write atomics) allowed.
    #[serde(default = "MmuWindow::default_permission")]
    pub write: bool,
}

impl MmuWindow {
    /// Windows are readable and writable unless stated otherwise.
    const fn default_permission() -> bool {
        true
    }

    /// Returns `true` if `vaddr` falls inside the window.
    pub const fn contains(&self, vaddr: u64) -> bool {
        vaddr >= self.vbase && vaddr - self.vbase < self.size
    }
}
