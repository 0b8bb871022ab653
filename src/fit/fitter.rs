//! Levenberg–Marquardt fit of the density relaxation model.
//!
//! Given samples `(t_i, y_i)` and a starting point, we minimize
//!
//! ```text
//! SSE(p) = Σ (y_i - d(t_i; p))²
//! ```
//!
//! over `p = (d_i, d_f, k)`. Each iteration solves the damped Gauss–Newton
//! step as the augmented linear least-squares problem
//!
//! ```text
//! [ J      ]     [ r ]
//! [ √λ · D ] δ = [ 0 ]
//! ```
//!
//! where `D` is the Marquardt column scaling (running maximum of the Jacobian
//! column norms, MINPACK style). Steps that fail to reduce the SSE increase
//! `λ`; accepted steps decrease it.

use log::{debug, trace};
use nalgebra::{DMatrix, DVector};

use crate::domain::{EquilibrationParams, FitQuality, FitResult, InitialGuess, Sample};
use crate::error::AppError;
use crate::math::{normal_matrix_inverse, solve_least_squares};
use crate::models::{fill_jacobian_row, predict};

const P: usize = EquilibrationParams::LEN;

/// Optimizer tuning.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Maximum number of Jacobian evaluations (outer iterations).
    pub max_iterations: usize,
    /// Stop when an accepted step reduces the SSE by at most this fraction.
    pub ftol: f64,
    /// Stop when the scaled step is at most this fraction of the scaled parameters.
    pub xtol: f64,
    /// Initial damping factor.
    pub initial_lambda: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200 * (P + 1),
            ftol: 1e-12,
            xtol: 1e-12,
            initial_lambda: 1e-3,
        }
    }
}

/// Upper bound for the damping factor before we give up on a point.
const LAMBDA_MAX: f64 = 1e20;
const LAMBDA_MIN: f64 = 1e-15;

/// Fit `d(t) = d_i + (d_f - d_i)(1 - exp(-k t))` to the samples.
pub fn fit_equilibration(
    samples: &[Sample],
    guess: &InitialGuess,
    opts: &FitOptions,
) -> Result<FitResult, AppError> {
    if samples.is_empty() {
        return Err(AppError::new(3, "No density samples to fit."));
    }
    if samples.len() < P {
        return Err(AppError::new(
            3,
            format!(
                "Need at least {P} density samples to fit {P} parameters, got {}.",
                samples.len()
            ),
        ));
    }
    if let Some(bad) = samples.iter().find(|s| !(s.time.is_finite() && s.density.is_finite())) {
        return Err(AppError::new(
            3,
            format!("Non-finite sample (time={}, density={}).", bad.time, bad.density),
        ));
    }
    let start = EquilibrationParams::from(*guess);
    if !start.to_array().iter().all(|v| v.is_finite()) {
        return Err(AppError::new(2, "Initial guess must be finite."));
    }

    let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.density).collect();
    let n = times.len();

    let mut p = start;
    let mut r = residuals(&p, &times, &ys);
    let mut sse = r.norm_squared();
    if !sse.is_finite() {
        return Err(AppError::new(4, "Model is not finite at the initial guess."));
    }

    let mut lambda = opts.initial_lambda;
    let mut scale = [0.0_f64; P];
    let mut j = jacobian(&p, &times);
    let mut converged = false;
    let mut iterations = 0usize;

    while iterations < opts.max_iterations {
        iterations += 1;
        update_scale(&mut scale, &j);

        let mut accepted = false;
        let mut first_try = true;
        loop {
            let step = match damped_step(&j, &r, &scale, lambda) {
                Some(step) => step,
                None => {
                    lambda *= 10.0;
                    if lambda > LAMBDA_MAX {
                        break;
                    }
                    first_try = false;
                    continue;
                }
            };

            let step_norm = scaled_norm(&scale, step.as_slice());
            let param_norm = scaled_norm(&scale, &p.to_array());

            let mut trial = p.to_array();
            for (v, d) in trial.iter_mut().zip(step.iter()) {
                *v += d;
            }
            let trial = EquilibrationParams::from_array(trial);
            let trial_r = residuals(&trial, &times, &ys);
            let trial_sse = trial_r.norm_squared();

            if trial_sse.is_finite() && trial_sse < sse {
                let reduction = sse - trial_sse;
                trace!(
                    "iter {iterations}: sse {sse:.6e} -> {trial_sse:.6e}, lambda={lambda:.3e}"
                );
                p = trial;
                r = trial_r;
                sse = trial_sse;
                accepted = true;

                if sse <= f64::MIN_POSITIVE
                    || step_norm <= opts.xtol * (param_norm + opts.xtol)
                    || (first_try && reduction <= opts.ftol * (sse + reduction))
                {
                    converged = true;
                }
                lambda = (lambda / 10.0).max(LAMBDA_MIN);
                break;
            }

            // No improvement possible within numerical precision: the current
            // point is already a minimum.
            if step_norm <= opts.xtol * (param_norm + opts.xtol) || sse <= f64::MIN_POSITIVE {
                converged = true;
                break;
            }

            lambda *= 10.0;
            first_try = false;
            if lambda > LAMBDA_MAX {
                break;
            }
        }

        if converged {
            break;
        }
        if !accepted {
            return Err(AppError::new(
                4,
                format!(
                    "Fit failed: damping exceeded {LAMBDA_MAX:e} without reducing the residual (iteration {iterations})."
                ),
            ));
        }
        j = jacobian(&p, &times);
    }

    if !converged {
        return Err(AppError::new(
            4,
            format!(
                "Fit did not converge within {} iterations (last SSE={sse:.6e}).",
                opts.max_iterations
            ),
        ));
    }

    let rmse = (sse / n as f64).sqrt();
    debug!(
        "fit converged after {iterations} iterations: sse={sse:.6e} rmse={rmse:.6e} n={n}"
    );

    let j = jacobian(&p, &times);
    Ok(FitResult {
        params: p,
        covariance: covariance(&j, sse, n),
        quality: FitQuality {
            sse,
            rmse,
            n,
            iterations,
        },
    })
}

fn residuals(p: &EquilibrationParams, times: &[f64], ys: &[f64]) -> DVector<f64> {
    DVector::from_iterator(
        times.len(),
        times.iter().zip(ys.iter()).map(|(&t, &y)| y - predict(p, t)),
    )
}

fn jacobian(p: &EquilibrationParams, times: &[f64]) -> DMatrix<f64> {
    let mut j = DMatrix::<f64>::zeros(times.len(), P);
    let mut row = [0.0; P];
    for (i, &t) in times.iter().enumerate() {
        fill_jacobian_row(p, t, &mut row);
        for c in 0..P {
            j[(i, c)] = row[c];
        }
    }
    j
}

fn update_scale(scale: &mut [f64; P], j: &DMatrix<f64>) {
    for (c, s) in scale.iter_mut().enumerate() {
        let norm = j.column(c).norm();
        if norm.is_finite() && norm > *s {
            *s = norm;
        }
    }
}

/// Column scale used for damping; zero columns get unit scale.
fn effective_scale(s: f64) -> f64 {
    if s > 0.0 { s } else { 1.0 }
}

fn scaled_norm(scale: &[f64; P], v: &[f64]) -> f64 {
    scale
        .iter()
        .zip(v.iter())
        .map(|(&s, &x)| {
            let y = effective_scale(s) * x;
            y * y
        })
        .sum::<f64>()
        .sqrt()
}

fn damped_step(
    j: &DMatrix<f64>,
    r: &DVector<f64>,
    scale: &[f64; P],
    lambda: f64,
) -> Option<DVector<f64>> {
    let n = j.nrows();
    let mut a = DMatrix::<f64>::zeros(n + P, P);
    let mut b = DVector::<f64>::zeros(n + P);

    a.rows_mut(0, n).copy_from(j);
    b.rows_mut(0, n).copy_from(r);

    let sl = lambda.sqrt();
    for c in 0..P {
        a[(n + c, c)] = sl * effective_scale(scale[c]);
    }

    solve_least_squares(&a, &b)
}

fn covariance(j: &DMatrix<f64>, sse: f64, n: usize) -> Option<[[f64; P]; P]> {
    if n <= P {
        return None;
    }
    let s2 = sse / (n - P) as f64;
    let inv = normal_matrix_inverse(j)?;
    let mut out = [[0.0; P]; P];
    for (i, row) in out.iter_mut().enumerate() {
        for (k, v) in row.iter_mut().enumerate() {
            *v = inv[(i, k)] * s2;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(p: &EquilibrationParams, times: &[f64]) -> Vec<Sample> {
        times.iter().map(|&t| Sample::new(t, predict(p, t))).collect()
    }

    #[test]
    fn recovers_exact_parameters_from_default_guess() {
        let truth = EquilibrationParams {
            initial_density: 0.995,
            final_density: 1.025,
            rate: 0.02,
        };
        let times: Vec<f64> = (1..=100).map(|i| i as f64 * 2.0).collect();
        let samples = synthetic(&truth, &times);

        let fit = fit_equilibration(&samples, &InitialGuess::default(), &FitOptions::default())
            .unwrap();

        assert!((fit.params.initial_density - truth.initial_density).abs() < 1e-4);
        assert!((fit.params.final_density - truth.final_density).abs() < 1e-4);
        assert!((fit.params.rate - truth.rate).abs() < 1e-4);
        assert!(fit.quality.rmse < 1e-8);
        assert_eq!(fit.quality.n, 100);
    }

    #[test]
    fn rejects_empty_input() {
        let err = fit_equilibration(&[], &InitialGuess::default(), &FitOptions::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejects_too_few_samples() {
        let samples = vec![Sample::new(1.0, 1.0), Sample::new(2.0, 1.01)];
        let err = fit_equilibration(&samples, &InitialGuess::default(), &FitOptions::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn rejects_non_finite_samples() {
        let samples = vec![
            Sample::new(1.0, 1.0),
            Sample::new(2.0, f64::NAN),
            Sample::new(3.0, 1.02),
        ];
        let err = fit_equilibration(&samples, &InitialGuess::default(), &FitOptions::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn reports_non_convergence_when_budget_is_exhausted() {
        let truth = EquilibrationParams {
            initial_density: 0.9,
            final_density: 1.05,
            rate: 0.01,
        };
        let times: Vec<f64> = (0..50).map(|i| i as f64 * 10.0).collect();
        let samples = synthetic(&truth, &times);
        let opts = FitOptions {
            max_iterations: 1,
            ..FitOptions::default()
        };
        let err = fit_equilibration(&samples, &InitialGuess::default(), &opts).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn covariance_is_symmetric_for_noisy_data() {
        let truth = EquilibrationParams {
            initial_density: 1.0,
            final_density: 1.03,
            rate: 0.05,
        };
        let samples: Vec<Sample> = (0..60)
            .map(|i| {
                let t = i as f64;
                // Deterministic alternating perturbation.
                let wiggle = if i % 2 == 0 { 5e-4 } else { -5e-4 };
                Sample::new(t, predict(&truth, t) + wiggle)
            })
            .collect();

        let fit = fit_equilibration(&samples, &InitialGuess::default(), &FitOptions::default())
            .unwrap();
        let cov = fit.covariance.unwrap();
        for i in 0..3 {
            assert!(cov[i][i] > 0.0);
            for k in 0..3 {
                assert!((cov[i][k] - cov[k][i]).abs() <= 1e-12 * cov[i][i].abs().max(1.0));
            }
        }
    }
}
