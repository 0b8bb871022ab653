//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - runs the parse + fit pipeline
//! - prints the fitted parameters
//! - shows the plot, then writes the PNG

use std::io::IsTerminal;

use clap::Parser;
use env_logger::Builder;
use log::{LevelFilter, info};

use crate::cli::Cli;
use crate::domain::{EquilConfig, InitialGuess, PlotWindow};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `density-equil` binary.
pub fn run() -> Result<(), AppError> {
    run_with(Cli::parse())
}

/// Run with already-parsed arguments.
pub fn run_with(cli: Cli) -> Result<(), AppError> {
    init_logging(cli.verbose);

    // Missing arguments are reported but are not a failure.
    if cli.files.is_empty() {
        println!("{}", crate::report::USAGE_ERROR);
        return Ok(());
    }

    let config = equil_config_from_args(&cli);
    let run = pipeline::run(&config)?;

    println!("{}", crate::report::format_params(&run.fit.params));

    // The PNG is written only after the viewer is closed.
    if std::io::stdout().is_terminal() {
        crate::tui::show(&run.chart, &run.fit)?;
    } else {
        info!("stdout is not a terminal; skipping interactive plot");
    }

    crate::plot::write_density_png(&run.chart, &config.output)
}

pub fn equil_config_from_args(cli: &Cli) -> EquilConfig {
    EquilConfig {
        log_paths: cli.files.clone(),
        guess: InitialGuess {
            initial_density: cli.di_guess,
            final_density: cli.df_guess,
            rate: cli.k_guess,
        },
        window: PlotWindow {
            y_min: cli.y_min,
            y_max: cli.y_max,
        },
        output: cli.output.clone(),
    }
}

/// Log to stderr; `RUST_LOG` overrides the defaults.
fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let _ = Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("density_equil"), level)
        .parse_default_env()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn config_carries_cli_values() {
        let cli = Cli::parse_from([
            "density-equil",
            "--di-guess",
            "0.9",
            "--y-max",
            "1.1",
            "-o",
            "out/plot.png",
            "a.out",
        ]);
        let config = equil_config_from_args(&cli);
        assert_eq!(config.log_paths, vec![PathBuf::from("a.out")]);
        assert_eq!(config.guess.initial_density, 0.9);
        assert_eq!(config.guess.final_density, 1.03);
        assert_eq!(config.window.y_min, 0.98);
        assert_eq!(config.window.y_max, 1.1);
        assert_eq!(config.output, PathBuf::from("out/plot.png"));
    }

    #[test]
    fn no_files_is_not_an_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("density.png");
        let cli = Cli::parse_from(["density-equil", "-o", out.to_str().unwrap()]);

        assert!(run_with(cli).is_ok());
        assert!(!out.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn no_files_with_default_output_is_ok() {
        let cli = Cli::parse_from(["density-equil"]);
        assert!(cli.files.is_empty());
        assert!(run_with(cli).is_ok());
    }
}
