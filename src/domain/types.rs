//! Shared domain types.
//!
//! Everything here is plain data: samples parsed from MD logs, the knobs that
//! drive a run, and the fitted relaxation parameters.

use std::path::PathBuf;

/// Default initial-density guess (g/cm3).
pub const DEFAULT_INITIAL_DENSITY_GUESS: f64 = 1.00;
/// Default final-density guess (g/cm3).
pub const DEFAULT_FINAL_DENSITY_GUESS: f64 = 1.03;
/// Default rate guess (1/ps).
pub const DEFAULT_RATE_GUESS: f64 = 0.0;
/// Default lower bound of the plotted density axis.
pub const DEFAULT_Y_MIN: f64 = 0.98;
/// Default upper bound of the plotted density axis.
pub const DEFAULT_Y_MAX: f64 = 1.04;
/// Default PNG output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "density.png";
/// Number of evenly spaced points on the fitted curve.
pub const CURVE_POINTS: usize = 100;

/// One step-block reading: simulation time (ps) and density (g/cm3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub density: f64,
}

impl Sample {
    pub fn new(time: f64, density: f64) -> Self {
        Self { time, density }
    }
}

/// Per-file bookkeeping kept alongside the concatenated samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSummary {
    pub path: PathBuf,
    pub samples: usize,
    pub reached_end_marker: bool,
}

/// Samples from all input files, in argument order then file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub samples: Vec<Sample>,
    pub logs: Vec<LogSummary>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `(min, max)` of the sample times, or `None` for an empty dataset.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let mut min_t = f64::INFINITY;
        let mut max_t = f64::NEG_INFINITY;
        for s in &self.samples {
            min_t = min_t.min(s.time);
            max_t = max_t.max(s.time);
        }
        if min_t.is_finite() && max_t.is_finite() {
            Some((min_t, max_t))
        } else {
            None
        }
    }
}

/// Starting point handed to the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialGuess {
    pub initial_density: f64,
    pub final_density: f64,
    pub rate: f64,
}

impl Default for InitialGuess {
    fn default() -> Self {
        Self {
            initial_density: DEFAULT_INITIAL_DENSITY_GUESS,
            final_density: DEFAULT_FINAL_DENSITY_GUESS,
            rate: DEFAULT_RATE_GUESS,
        }
    }
}

impl From<InitialGuess> for EquilibrationParams {
    fn from(g: InitialGuess) -> Self {
        Self {
            initial_density: g.initial_density,
            final_density: g.final_density,
            rate: g.rate,
        }
    }
}

/// Fixed density-axis range for the plot.
///
/// Not validated: `y_min > y_max` is passed through to the renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotWindow {
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for PlotWindow {
    fn default() -> Self {
        Self {
            y_min: DEFAULT_Y_MIN,
            y_max: DEFAULT_Y_MAX,
        }
    }
}

/// Parameters of `d(t) = d_i + (d_f - d_i) * (1 - exp(-k t))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquilibrationParams {
    pub initial_density: f64,
    pub final_density: f64,
    pub rate: f64,
}

impl EquilibrationParams {
    pub const LEN: usize = 3;

    pub fn to_array(self) -> [f64; 3] {
        [self.initial_density, self.final_density, self.rate]
    }

    pub fn from_array([initial_density, final_density, rate]: [f64; 3]) -> Self {
        Self {
            initial_density,
            final_density,
            rate,
        }
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
    pub iterations: usize,
}

/// Output of a single relaxation fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub params: EquilibrationParams,
    /// Parameter covariance `s^2 (J^T J)^-1`, row-major in
    /// `(initial_density, final_density, rate)` order. `None` when `J^T J`
    /// is singular at the optimum.
    pub covariance: Option<[[f64; 3]; 3]>,
    pub quality: FitQuality,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct EquilConfig {
    pub log_paths: Vec<PathBuf>,
    pub guess: InitialGuess,
    pub window: PlotWindow,
    pub output: PathBuf,
}
