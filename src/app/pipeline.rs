//! The run pipeline, split into a data-collection phase and an analysis phase.
//!
//! `collect_dataset` only reads logs; `analyze` only fits and prepares the
//! plot. The `Dataset` returned by the first is the whole hand-off between
//! them.

use std::path::PathBuf;

use log::debug;

use crate::domain::{Dataset, EquilConfig, FitResult, InitialGuess, PlotWindow};
use crate::error::AppError;
use crate::fit::{FitOptions, fit_equilibration};
use crate::plot::{ChartData, chart_data};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub fit: FitResult,
    pub chart: ChartData,
}

/// Parse every log (argument order) into one dataset.
pub fn collect_dataset(paths: &[PathBuf]) -> Result<Dataset, AppError> {
    crate::io::load_dataset(paths)
}

/// Fit the relaxation model and prepare the chart.
pub fn analyze(
    dataset: &Dataset,
    guess: &InitialGuess,
    window: &PlotWindow,
) -> Result<(FitResult, ChartData), AppError> {
    let fit = fit_equilibration(&dataset.samples, guess, &FitOptions::default())?;
    debug!("{}", crate::report::format_fit_diagnostics(dataset, &fit));
    let chart = chart_data(dataset, &fit, window);
    Ok((fit, chart))
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &EquilConfig) -> Result<RunOutput, AppError> {
    let dataset = collect_dataset(&config.log_paths)?;
    let (fit, chart) = analyze(&dataset, &config.guess, &config.window)?;
    Ok(RunOutput {
        dataset,
        fit,
        chart,
    })
}
