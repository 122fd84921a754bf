//! Memory port contract.
//!
//! A memory port is whatever sits downstream of the LSU's data master: a
//! bus, a RAM, a peripheral. It accepts one transaction at a time and answers
//! immediately with an [`IoStatus`]. A `Pending` answer obliges the port to
//! retire that same transaction exactly once, later, from [`MemoryPort::tick`],
//! filling in the data and the realized latency.

use crate::core::units::lsu::{IoReq, IoStatus};

/// Downstream target of the LSU's data transactions.
pub trait MemoryPort {
    /// Submits a transaction.
    ///
    /// On `Ok` the port has completed the access in place (read data in
    /// `req.data_mut()`, atomic result in `req.second_data_mut()`, latency
    /// set). On `Pending` it keeps its own record of the access and leaves
    /// `req` untouched until it retires.
    fn submit(&mut self, req: &mut IoReq) -> IoStatus;

    /// Advances the port by one cycle while `req` is outstanding.
    ///
    /// Returns `true` on the single cycle the pending transaction retires,
    /// after completing it into `req`. Ports that never answer `Pending`
    /// keep the default.
    fn tick(&mut self, _req: &mut IoReq) -> bool {
        false
    }
}
