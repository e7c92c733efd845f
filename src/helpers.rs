use crate::error::{RasterError, RasterResult};

pub fn int32x32_to64(a: i32, b: i32) -> i64 { a as i64 * b as i64 }

// Both arguments are non-negative and `denominator` is non-zero.
pub fn quotient_remainder(numerator: i32, denominator: i32) -> (i32, i32) {
    debug_assert!(numerator >= 0 && denominator > 0);
    (numerator / denominator, numerator % denominator)
}

/// Allocate a vector with room for `capacity` elements, reporting failure
/// instead of aborting.
pub fn try_vec_with_capacity<T>(capacity: usize) -> RasterResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity).map_err(RasterError::alloc(capacity))?;
    Ok(v)
}

/// Allocate a vector of `len` copies of `value`, reporting failure instead of
/// aborting.
pub fn try_vec_filled<T: Clone>(len: usize, value: T) -> RasterResult<Vec<T>> {
    let mut v = try_vec_with_capacity(len)?;
    v.resize(len, value);
    Ok(v)
}

/// Approximate `1 / sqrt(x)`.
///
/// Bit-level initial guess refined by two Newton-Raphson steps; relative
/// error is below 5e-6 for normal inputs. `x == 0` gives a large finite value
/// rather than infinity, so ratios built from two of these never turn into
/// `inf / inf`.
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let mut y = f32::from_bits(0x5f37_59df - (x.to_bits() >> 1));
    y *= 1.5 - half * y * y;
    y *= 1.5 - half * y * y;
    y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_is_an_error() {
        assert_eq!(
            try_vec_with_capacity::<u64>(usize::MAX).err(),
            Some(RasterError::AllocationFailed(usize::MAX))
        );
        assert_eq!(
            try_vec_filled(usize::MAX, 0u8).err(),
            Some(RasterError::AllocationFailed(usize::MAX))
        );
        let v = try_vec_filled(3, 1.5f32).unwrap();
        assert_eq!(v, vec![1.5; 3]);
    }

    #[test]
    fn quotient_remainder_splits() {
        assert_eq!(quotient_remainder(7, 3), (2, 1));
        assert_eq!(quotient_remainder(2, 5), (0, 2));
        assert_eq!(quotient_remainder(5, 5), (1, 0));
    }

    #[test]
    fn fast_inv_sqrt_is_close() {
        for &x in &[1e-6f32, 0.01, 0.25, 1.0, 2.0, 123.456, 1e6] {
            let exact = 1.0 / x.sqrt();
            let approx = fast_inv_sqrt(x);
            assert!(((approx - exact) / exact).abs() < 1e-5, "{} {} {}", x, approx, exact);
        }
    }

    #[test]
    fn fast_inv_sqrt_of_zero_is_finite() {
        let y = fast_inv_sqrt(0.0);
        assert!(y.is_finite() && y > 1e18);
    }

    #[test]
    fn fast_inv_sqrt_is_monotonic() {
        let mut last = f32::INFINITY;
        let mut x = 1e-4f32;
        while x < 4.0 {
            let y = fast_inv_sqrt(x);
            assert!(y <= last);
            last = y;
            x *= 1.07;
        }
    }

    #[test]
    fn filled_vec_has_len() {
        let v = try_vec_filled(5, 0i32).unwrap();
        assert_eq!(v, vec![0; 5]);
    }
}
