//! Terminal reporting of fit results.
//!
//! stdout carries only the three parameter lines; anything else goes through
//! the logger so the output stays easy to scrape.

use crate::domain::{Dataset, EquilibrationParams, FitResult};

/// Printed when no log files are given.
pub const USAGE_ERROR: &str = "\nERROR: script needs md.out file(s) as command line argument(s)\n";

/// Format the fitted parameters as three labeled, tab-separated lines.
pub fn format_params(params: &EquilibrationParams) -> String {
    format!(
        "Initial density:\t{:?}\nFinal density:\t{:?}\nRate:\t{:?}",
        params.initial_density, params.final_density, params.rate
    )
}

/// One-line fit diagnostics for debug logging.
pub fn format_fit_diagnostics(dataset: &Dataset, fit: &FitResult) -> String {
    let (t_min, t_max) = dataset.time_range().unwrap_or((f64::NAN, f64::NAN));
    format!(
        "n={} logs={} t=[{t_min:.3}, {t_max:.3}]ps sse={:.6e} rmse={:.6e} iterations={}",
        fit.quality.n,
        dataset.logs.len(),
        fit.quality.sse,
        fit.quality.rmse,
        fit.quality.iterations
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitQuality, Sample};

    #[test]
    fn params_are_printed_as_labeled_lines() {
        let p = EquilibrationParams {
            initial_density: 1.0,
            final_density: 1.0254,
            rate: 0.0125,
        };
        assert_eq!(
            format_params(&p),
            "Initial density:\t1.0\nFinal density:\t1.0254\nRate:\t0.0125"
        );
    }

    #[test]
    fn usage_error_text() {
        assert_eq!(
            USAGE_ERROR,
            "\nERROR: script needs md.out file(s) as command line argument(s)\n"
        );
    }

    #[test]
    fn diagnostics_mention_sample_count() {
        let dataset = Dataset {
            samples: vec![Sample::new(1.0, 1.0), Sample::new(3.0, 1.01)],
            logs: Vec::new(),
        };
        let fit = FitResult {
            params: EquilibrationParams {
                initial_density: 1.0,
                final_density: 1.02,
                rate: 0.1,
            },
            covariance: None,
            quality: FitQuality {
                sse: 1e-6,
                rmse: 7e-4,
                n: 2,
                iterations: 7,
            },
        };
        let line = format_fit_diagnostics(&dataset, &fit);
        assert!(line.starts_with("n=2 logs=0 t=[1.000, 3.000]ps"));
        assert!(line.ends_with("iterations=7"));
    }
}
