//! Stable basis functions for first-order relaxation.
//!
//! The relaxation model is built from:
//!
//! - `saturation(x) = 1 - exp(-x)`  (rises from 0 to 1)
//! - `decay(x)      = exp(-x)`      (falls from 1 to 0)
//!
//! Numerical notes:
//! - For small `x`, `1 - exp(-x)` suffers from catastrophic cancellation, so
//!   we compute it as `-expm1(-x)` with a short series fallback near zero.
//! - `saturation(x) + decay(x) == 1` up to rounding.

/// Threshold below which we switch to a small-x series approximation.
const SMALL_X: f64 = 1e-8;

/// Compute `1 - exp(-x)` in a numerically stable way.
pub fn saturation(x: f64) -> f64 {
    if x.abs() < SMALL_X {
        // Series: 1 - e^{-x} ≈ x - x^2/2
        return x - (x * x) / 2.0;
    }
    -(-x).exp_m1()
}

/// Compute `exp(-x)`.
pub fn decay(x: f64) -> f64 {
    (-x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_limits() {
        assert_eq!(saturation(0.0), 0.0);
        assert!((saturation(1e-12) - 1e-12).abs() < 1e-24);
        assert!((saturation(50.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn saturation_and_decay_are_complementary() {
        for &x in &[-2.0, -1e-9, 0.0, 1e-7, 0.3, 1.0, 10.0] {
            let sum = saturation(x) + decay(x);
            assert!((sum - 1.0).abs() < 1e-12, "x={x} sum={sum}");
        }
    }
}
