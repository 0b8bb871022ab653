//! Linear least squares helpers for the Levenberg–Marquardt fitter.
//!
//! Every damped step solves a small linear problem of the form
//!
//! ```text
//! minimize ‖A δ - b‖²
//! ```
//!
//! where `A` stacks the Jacobian on top of the damping rows. `A` is tall
//! (samples + 3 rows, 3 columns) so we use SVD rather than a square solver.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = a.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-14, 1e-12, 1e-10] {
        if let Ok(x) = svd.solve(b, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}

/// Inverse of the normal matrix `JᵀJ`.
///
/// Returns `None` when the matrix is singular or the inverse is not finite.
pub fn normal_matrix_inverse(j: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let jtj = j.transpose() * j;
    let inv = jtj.try_inverse()?;
    if inv.iter().all(|v| v.is_finite()) {
        Some(inv)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let x = solve_least_squares(&a, &b).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-10);
        assert!((x[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn normal_matrix_inverse_rejects_rank_deficient_jacobian() {
        // Second column is identically zero.
        let j = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert!(normal_matrix_inverse(&j).is_none());

        let j = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);
        let inv = normal_matrix_inverse(&j).unwrap();
        assert!((inv[(0, 0)] - 0.25).abs() < 1e-12);
        assert!((inv[(1, 1)] - 1.0 / 16.0).abs() < 1e-12);
    }
}
