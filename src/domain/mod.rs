//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed observations (`Sample`, `Dataset`)
//! - run configuration (`InitialGuess`, `PlotWindow`, `EquilConfig`)
//! - fit outputs (`EquilibrationParams`, `FitResult`)

pub mod types;

pub use types::*;
