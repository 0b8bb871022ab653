//! Input helpers.
//!
//! - MD log parsing and dataset assembly (`md_log`)

pub mod md_log;

pub use md_log::*;
