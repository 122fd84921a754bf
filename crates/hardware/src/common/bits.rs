//! Width-dependent value transforms.
//!
//! Loads narrower than the destination register land zero-extended in the
//! register. These helpers apply the fix-ups resume continuations need:
//! sign extension for signed integer loads and atomics, and NaN-boxing for
//! narrow floating-point loads into the 64-bit FP file.

/// Sign-extends the low `bits` bits of `val` to 64 bits.
///
/// `bits` of 0 or 64 and above return `val` unchanged.
///
/// # Arguments
///
/// * `val`  - Raw register contents.
/// * `bits` - Width of the meaningful low part in bits.
///
/// # Returns
///
/// The 64-bit two's-complement extension of the low part.
#[inline]
pub const fn sign_extend(val: u64, bits: u32) -> u64 {
    if bits == 0 || bits >= 64 {
        return val;
    }
    let shift = 64 - bits;
    (((val << shift) as i64) >> shift) as u64
}

/// NaN-boxes the low `bits` bits of `val`: every bit above the value is set to 1.
///
/// A 32-bit single stored in a 64-bit FP register must read back as a valid
/// single, which RISC-V encodes by filling the upper half with ones.
///
/// # Arguments
///
/// * `val`  - Raw register contents.
/// * `bits` - Width of the loaded value in bits.
///
/// # Returns
///
/// The boxed 64-bit value.
#[inline]
pub const fn nan_box(val: u64, bits: u32) -> u64 {
    if bits == 0 || bits >= 64 {
        return val;
    }
    let low = val & ((1u64 << bits) - 1);
    low | (u64::MAX << bits)
}

/// Keeps the low `bytes` bytes of `val`.
#[inline]
pub const fn truncate(val: u64, bytes: usize) -> u64 {
    if bytes >= 8 {
        val
    } else {
        val & ((1u64 << (bytes * 8)) - 1)
    }
}
