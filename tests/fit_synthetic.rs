//! Parameter recovery on synthetic relaxation data.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use density_equil::domain::{EquilibrationParams, InitialGuess, Sample};
use density_equil::fit::{FitOptions, fit_equilibration};
use density_equil::models::predict;

fn exact_samples(p: &EquilibrationParams, t_max: f64, n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let t = t_max * i as f64 / (n as f64 - 1.0);
            Sample::new(t, predict(p, t))
        })
        .collect()
}

#[test]
fn recovers_known_parameters_from_close_guess() {
    let cases = [
        (0.97, 1.02, 0.004, 1000.0),
        (1.00, 1.03, 0.05, 200.0),
        (1.05, 1.01, 0.1, 100.0), // contracting box: density falls
    ];

    for (di, df, k, t_max) in cases {
        let truth = EquilibrationParams {
            initial_density: di,
            final_density: df,
            rate: k,
        };
        let samples = exact_samples(&truth, t_max, 80);
        let guess = InitialGuess {
            initial_density: di + 0.01,
            final_density: df - 0.01,
            rate: k * 1.5,
        };

        let fit = fit_equilibration(&samples, &guess, &FitOptions::default()).unwrap();
        let p = fit.params;
        assert!((p.initial_density - di).abs() < 1e-4, "case {truth:?}: {p:?}");
        assert!((p.final_density - df).abs() < 1e-4, "case {truth:?}: {p:?}");
        assert!((p.rate - k).abs() < 1e-4, "case {truth:?}: {p:?}");
    }
}

#[test]
fn recovers_parameters_from_noisy_data() {
    let truth = EquilibrationParams {
        initial_density: 0.985,
        final_density: 1.024,
        rate: 0.02,
    };
    let mut rng = StdRng::seed_from_u64(7);
    let noise = Normal::new(0.0, 1e-3).unwrap();

    let samples: Vec<Sample> = (0..400)
        .map(|i| {
            let t = i as f64;
            Sample::new(t, predict(&truth, t) + noise.sample(&mut rng))
        })
        .collect();

    let fit = fit_equilibration(&samples, &InitialGuess::default(), &FitOptions::default()).unwrap();
    let p = fit.params;

    assert!((p.initial_density - truth.initial_density).abs() < 2e-3, "{p:?}");
    assert!((p.final_density - truth.final_density).abs() < 2e-3, "{p:?}");
    assert!((p.rate - truth.rate).abs() < 5e-3, "{p:?}");
    // Residual scatter should match the injected noise level.
    assert!(fit.quality.rmse > 5e-4 && fit.quality.rmse < 2e-3, "rmse={}", fit.quality.rmse);
    assert!(fit.covariance.is_some());
}
