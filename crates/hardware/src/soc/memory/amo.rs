//! Atomic memory operation ALU.
//!
//! Implements the read-modify-write arithmetic a memory target applies for an
//! atomic transaction. Given the current memory value and the operand carried
//! by the transaction, computes the value written back to memory.
//!
//! Operands are `size` bytes wide (1, 2, 4 or 8). Signed comparisons
//! sign-extend both sides from the access width first; the result is
//! truncated back to the access width.

use crate::common::bits::{sign_extend, truncate};
use crate::core::units::lsu::AtomicOp;

/// Performs the read-modify-write step of an atomic operation.
///
/// # Arguments
///
/// * `op`      - The atomic operation type
/// * `mem_val` - The current value read from memory
/// * `operand` - The operand carried by the transaction
/// * `size`    - Access width in bytes
///
/// # Returns
///
/// The value to store back, truncated to `size` bytes. `Lr` and `Sc` are not
/// read-modify-write operations and return `mem_val` and `operand`
/// respectively.
pub fn amo_alu(op: AtomicOp, mem_val: u64, operand: u64, size: usize) -> u64 {
    let bits = (size * 8) as u32;
    let a = truncate(mem_val, size);
    let b = truncate(operand, size);
    let sa = sign_extend(a, bits) as i64;
    let sb = sign_extend(b, bits) as i64;
    let res = match op {
        AtomicOp::Lr => a,
        AtomicOp::Sc | AtomicOp::Swap => b,
        AtomicOp::Add => a.wrapping_add(b),
        AtomicOp::Xor => a ^ b,
        AtomicOp::And => a & b,
        AtomicOp::Or => a | b,
        AtomicOp::Min => sa.min(sb) as u64,
        AtomicOp::Max => sa.max(sb) as u64,
        AtomicOp::Minu => a.min(b),
        AtomicOp::Maxu => a.max(b),
    };
    truncate(res, size)
}
