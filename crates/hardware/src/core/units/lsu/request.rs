//! Bus transaction owned by the load-store unit.
//!
//! One `IoReq` lives inside each LSU and is re-initialised for every access
//! rather than allocated. Its `state` field says whether it is idle, waiting
//! on the memory port or retired, which is what the LSU uses to refuse a new
//! access while one is in flight.
//!
//! Data travels by value: store data is copied from the register file into
//! `data` before submission, and load data (or an atomic's result in
//! `second_data`) is copied back into the register slot recorded at issue
//! time once the transaction retires.

use std::fmt;

use crate::common::reg::DataSlot;

/// Largest access a single transaction carries, in bytes.
pub const MAX_ACCESS_SIZE: usize = 8;

/// Immediate answer of a memory port to a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IoStatus {
    /// Fully satisfied synchronously.
    Ok,
    /// Accepted; the port retires it later, exactly once.
    Pending,
    /// Rejected (protection or addressing violation). Never retried.
    Invalid,
}

/// Read-modify-write flavour of an atomic transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomicOp {
    /// Load-reserved (atomic load with reservation).
    Lr,
    /// Store-conditional (atomic store if reservation valid).
    Sc,
    /// Atomic swap.
    Swap,
    /// Atomic add.
    Add,
    /// Atomic XOR.
    Xor,
    /// Atomic AND.
    And,
    /// Atomic OR.
    Or,
    /// Atomic minimum (signed).
    Min,
    /// Atomic maximum (signed).
    Max,
    /// Atomic minimum (unsigned).
    Minu,
    /// Atomic maximum (unsigned).
    Maxu,
}

impl AtomicOp {
    /// Load-reserve is the only atomic translated with read intent.
    pub const fn is_load_reserve(self) -> bool {
        matches!(self, Self::Lr)
    }
}

/// Transaction opcode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IoOpcode {
    /// Plain read or write, direction given by `is_write`.
    #[default]
    Plain,
    /// Atomic operation carrying an operand in `data` and a result slot in `second_data`.
    Atomic(AtomicOp),
}

impl fmt::Display for IoOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Atomic(op) => write!(f, "{op:?}"),
        }
    }
}

/// Lifecycle of the reusable transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReqState {
    /// Never issued, or rejected.
    #[default]
    Idle,
    /// Submitted and answered `Pending`; waiting for the port to retire it.
    InFlight,
    /// Completed, synchronously or through a response.
    Retired,
}

/// One physical bus-level read, write or atomic request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IoReq {
    addr: u64,
    size: usize,
    is_write: bool,
    opcode: IoOpcode,
    data: [u8; MAX_ACCESS_SIZE],
    second_data: [u8; MAX_ACCESS_SIZE],
    initiator: u64,
    latency: u64,
    state: ReqState,
    /// Register slot the read data lands in.
    pub(crate) slot: Option<DataSlot>,
    /// Register slot an atomic result lands in.
    pub(crate) result_slot: Option<DataSlot>,
}

impl IoReq {
    /// Creates an idle, zeroed transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every field for reuse.
    pub fn init(&mut self) {
        *self = Self::default();
    }

    /// Target address.
    pub const fn addr(&self) -> u64 {
        self.addr
    }

    /// Sets the target address.
    pub const fn set_addr(&mut self, addr: u64) {
        self.addr = addr;
    }

    /// Size in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Sets the size in bytes, clamped to [`MAX_ACCESS_SIZE`].
    pub fn set_size(&mut self, size: usize) {
        self.size = size.min(MAX_ACCESS_SIZE);
    }

    /// Direction of a plain transaction.
    pub const fn is_write(&self) -> bool {
        self.is_write
    }

    /// Sets the direction.
    pub const fn set_is_write(&mut self, is_write: bool) {
        self.is_write = is_write;
    }

    /// Opcode.
    pub const fn opcode(&self) -> IoOpcode {
        self.opcode
    }

    /// Sets the opcode.
    pub const fn set_opcode(&mut self, opcode: IoOpcode) {
        self.opcode = opcode;
    }

    /// Primary data: store data or atomic operand, read data on return.
    pub fn data(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Mutable primary data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.size]
    }

    /// Secondary data: the result slot of an atomic.
    pub fn second_data(&self) -> &[u8] {
        &self.second_data[..self.size]
    }

    /// Mutable secondary data.
    pub fn second_data_mut(&mut self) -> &mut [u8] {
        &mut self.second_data[..self.size]
    }

    /// Identifier of the originating hart.
    pub const fn initiator(&self) -> u64 {
        self.initiator
    }

    /// Sets the originating hart.
    pub const fn set_initiator(&mut self, initiator: u64) {
        self.initiator = initiator;
    }

    /// Latency reported by the port, in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Sets the reported latency.
    pub const fn set_latency(&mut self, latency: u64) {
        self.latency = latency;
    }

    /// Lifecycle state.
    pub const fn state(&self) -> ReqState {
        self.state
    }

    pub(crate) const fn set_state(&mut self, state: ReqState) {
        self.state = state;
    }

    /// Returns `true` while the port owes a response.
    pub const fn is_in_flight(&self) -> bool {
        matches!(self.state, ReqState::InFlight)
    }
}
