//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value into the symmetric range `[-limit, limit]`.
///
/// A negative limit is treated as its magnitude.
pub fn clamp_sym<T>(value: T, limit: T) -> T
where
    T: Float,
{
    let limit = limit.abs();

    value.max(-limit).min(limit)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Returns true if `a` and `b` differ by no more than `tol`.
pub fn approx_eq<T>(a: T, b: T, tol: T) -> bool
where
    T: Float,
{
    (a - b).abs() <= tol
}
