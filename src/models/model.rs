//! Evaluation of the density relaxation model.
//!
//! ```text
//! d(t) = d_i + (d_f - d_i) * (1 - exp(-k t))
//! ```
//!
//! The fitter relies on two primitive operations:
//! - predict `d(t)` for a parameter set (residuals, plots)
//! - fill a Jacobian row `∂d/∂(d_i, d_f, k)` at a given time

use crate::domain::EquilibrationParams;
use crate::math::{decay, saturation};

/// Predict the density at time `t`.
pub fn predict(params: &EquilibrationParams, t: f64) -> f64 {
    let s = saturation(params.rate * t);
    params.initial_density + (params.final_density - params.initial_density) * s
}

/// Fill the Jacobian row of the model at time `t`.
///
/// Column order matches `EquilibrationParams::to_array`.
///
/// # Panics
/// Panics if `out` is shorter than `EquilibrationParams::LEN`.
pub fn fill_jacobian_row(params: &EquilibrationParams, t: f64, out: &mut [f64]) {
    let x = params.rate * t;
    let s = saturation(x);
    let e = decay(x);
    out[0] = 1.0 - s;
    out[1] = s;
    out[2] = (params.final_density - params.initial_density) * t * e;
}

/// Evaluate the model on `n` evenly spaced times spanning `[t_min, t_max]`.
///
/// Both endpoints are included; `n` is clamped to at least 2.
pub fn sample_curve(params: &EquilibrationParams, t_min: f64, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let t = if i == n - 1 { t_max } else { t_min + u * (t_max - t_min) };
        out.push((t, predict(params, t)));
    }
    out
}
