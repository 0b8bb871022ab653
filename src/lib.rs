//! `density-equil` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - log parsing and fitting are testable without spawning processes
//! - the collection and analysis phases can be driven separately

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
