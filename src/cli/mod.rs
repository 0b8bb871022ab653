//! Command-line parsing for the density equilibration checker.
//!
//! Parsing is kept separate from the pipeline; `app` turns a `Cli` into an
//! `EquilConfig`.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{
    DEFAULT_FINAL_DENSITY_GUESS, DEFAULT_INITIAL_DENSITY_GUESS, DEFAULT_OUTPUT, DEFAULT_RATE_GUESS,
    DEFAULT_Y_MAX, DEFAULT_Y_MIN,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "density-equil",
    version,
    about = "Fit density equilibration from MD log files"
)]
pub struct Cli {
    /// MD log files (e.g. md.out), processed in the given order.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Initial-density guess for the fit (g/cm3).
    #[arg(long, default_value_t = DEFAULT_INITIAL_DENSITY_GUESS, allow_negative_numbers = true)]
    pub di_guess: f64,

    /// Final-density guess for the fit (g/cm3).
    #[arg(long, default_value_t = DEFAULT_FINAL_DENSITY_GUESS, allow_negative_numbers = true)]
    pub df_guess: f64,

    /// Rate guess for the fit (1/ps).
    #[arg(long, default_value_t = DEFAULT_RATE_GUESS, allow_negative_numbers = true)]
    pub k_guess: f64,

    /// Lower bound of the plotted density axis.
    #[arg(long, default_value_t = DEFAULT_Y_MIN, allow_negative_numbers = true)]
    pub y_min: f64,

    /// Upper bound of the plotted density axis.
    #[arg(long, default_value_t = DEFAULT_Y_MAX, allow_negative_numbers = true)]
    pub y_max: f64,

    /// PNG file to write (overwritten if present).
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
