//! Transformation module.
//!
//! - Projection: solver output to the five reported columns
//! - Pipeline: load, solve, project, write

pub mod pipeline;
pub mod projection;

pub use pipeline::*;
pub use projection::{Projection, OUTPUT_COLUMNS};
