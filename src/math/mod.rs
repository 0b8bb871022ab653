//! Mathematical utilities: relaxation basis and linear least squares.

pub mod basis;
pub mod ols;

pub use basis::*;
pub use ols::*;
