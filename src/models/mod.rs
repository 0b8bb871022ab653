//! Density relaxation model.
//!
//! The model is implemented as small, pure functions so that the fitter and
//! the renderers can share them.

pub mod model;

pub use model::*;
