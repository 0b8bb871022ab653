//! Plot preparation and PNG rendering.
//!
//! Series and bounds are computed once (`chart_data`) and shared by the PNG
//! writer and the terminal viewer, so both show exactly the same picture.

use crate::domain::{CURVE_POINTS, Dataset, FitResult, PlotWindow};
use crate::models::sample_curve;

pub mod png;

pub use png::*;

pub const TITLE: &str = "Density Equilibration";
pub const X_LABEL: &str = "Time [ps]";
pub const Y_LABEL: &str = "Density [g/cm3]";
pub const DATA_LABEL: &str = "Raw data";
pub const FIT_LABEL: &str = "Fit";

/// Render-ready series for one fit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Raw `(time, density)` samples.
    pub points: Vec<(f64, f64)>,
    /// Fitted curve on `CURVE_POINTS` evenly spaced times over `[min t, max t]`.
    pub curve: Vec<(f64, f64)>,
    /// Time axis bounds.
    pub x_bounds: [f64; 2],
    /// Density axis bounds, taken verbatim from the plot window.
    pub y_bounds: [f64; 2],
}

/// Build chart series for a fitted dataset.
pub fn chart_data(dataset: &Dataset, fit: &FitResult, window: &PlotWindow) -> ChartData {
    let points: Vec<(f64, f64)> = dataset.samples.iter().map(|s| (s.time, s.density)).collect();

    let (t_min, t_max) = dataset.time_range().unwrap_or((0.0, 1.0));
    let curve = sample_curve(&fit.params, t_min, t_max, CURVE_POINTS);

    // A single time value (or all samples at one time) still needs a
    // non-degenerate axis.
    let (mut x0, mut x1) = (t_min, t_max);
    if (x1 - x0).abs() < 1e-9 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    ChartData {
        points,
        curve,
        x_bounds: [x0, x1],
        y_bounds: [window.y_min, window.y_max],
    }
}
