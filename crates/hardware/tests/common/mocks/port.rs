//! Scripted, recording memory port.
//!
//! Every submitted transaction is logged in order. Answers come from a script
//! of `(status, latency)` pairs, falling back to a default once the script
//! runs out. Read data follows a fixed pattern: the byte at address `a` is
//! `a as u8`, so a load's result tells which addresses were read.

use std::collections::VecDeque;

use iss_core::core::units::lsu::{IoOpcode, IoReq, IoStatus};
use iss_core::soc::MemoryPort;

/// One transaction as the port saw it at submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submitted {
    pub addr: u64,
    pub size: usize,
    pub is_write: bool,
    pub opcode: IoOpcode,
    pub initiator: u64,
    pub data: Vec<u8>,
}

pub struct ScriptedPort {
    pub log: Vec<Submitted>,
    script: VecDeque<(IoStatus, u64)>,
    default: (IoStatus, u64),
    pending: Option<u64>,
}

impl Default for ScriptedPort {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPort {
    /// Answers `Ok` with zero latency to everything.
    pub fn new() -> Self {
        Self::answering(IoStatus::Ok, 0)
    }

    /// Answers `status` with `latency` to everything.
    pub fn answering(status: IoStatus, latency: u64) -> Self {
        Self {
            log: Vec::new(),
            script: VecDeque::new(),
            default: (status, latency),
            pending: None,
        }
    }

    /// Answers the next transactions from `script`, in order.
    pub fn scripted(script: &[(IoStatus, u64)]) -> Self {
        let mut port = Self::new();
        port.script = script.iter().copied().collect();
        port
    }

    pub fn pattern(addr: u64) -> u8 {
        addr as u8
    }

    fn complete(req: &mut IoReq, latency: u64) {
        if !req.is_write() {
            let base = req.addr();
            for (i, byte) in req.data_mut().iter_mut().enumerate() {
                *byte = Self::pattern(base + i as u64);
            }
        }
        req.set_latency(latency);
    }
}

impl MemoryPort for ScriptedPort {
    fn submit(&mut self, req: &mut IoReq) -> IoStatus {
        self.log.push(Submitted {
            addr: req.addr(),
            size: req.size(),
            is_write: req.is_write(),
            opcode: req.opcode(),
            initiator: req.initiator(),
            data: req.data().to_vec(),
        });

        let (status, latency) = self.script.pop_front().unwrap_or(self.default);
        match status {
            IoStatus::Ok => Self::complete(req, latency),
            IoStatus::Pending => self.pending = Some(latency),
            IoStatus::Invalid => {}
        }
        status
    }

    fn tick(&mut self, req: &mut IoReq) -> bool {
        match self.pending.take() {
            Some(latency) => {
                Self::complete(req, latency);
                true
            }
            None => false,
        }
    }
}
