//! Curve fitting.
//!
//! A single nonlinear least-squares fit (Levenberg–Marquardt) of the density
//! relaxation model.

pub mod fitter;

pub use fitter::*;
