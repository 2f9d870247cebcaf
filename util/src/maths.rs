//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Wrap a (possibly negative) index onto a circular sequence of length `len`.
///
/// # Panics
/// - If `len` is zero.
pub fn wrap_index(index: i64, len: usize) -> usize {
    assert!(len > 0, "Cannot wrap an index onto an empty sequence");
    index.rem_euclid(len as i64) as usize
}

/// Forward distance, in elements, from `from` to `to` around a circular sequence of length `len`.
pub fn circular_offset(from: usize, to: usize, len: usize) -> usize {
    wrap_index(to as i64 - from as i64, len)
}

/// Clamp a value into the symmetric range `[-limit, limit]`.
pub fn clamp_sym<T>(value: T, limit: T) -> T
where
    T: Float,
{
    let limit = limit.abs();
    value.max(-limit).min(limit)
}
