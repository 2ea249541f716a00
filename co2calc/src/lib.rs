//! # co2calc - Carbonate chemistry for seawater observation tables
//!
//! co2calc reads a table of pCO2, pH, salinity and temperature observations,
//! solves the marine carbonate system for every row, and writes aragonite
//! and calcite saturation states, total alkalinity, DIC and total-scale pH
//! to a CSV file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ XLSX / CSV  │────▶│   Parser    │────▶│   CO2SYS    │────▶│  CSV out    │
//! │ observations│     │ (calamine)  │     │  (solver)   │     │ (5 columns) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use co2calc::{run, PipelineOptions};
//!
//! let report = run(&PipelineOptions::default())?;
//! println!("Wrote {} rows", report.row_count);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Observation rows and table
//! - [`parser`] - Workbook and delimited text loading
//! - [`co2sys`] - Carbonate system solver
//! - [`transform`] - Output projection and pipeline
//! - [`export`] - CSV writer
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Loading
pub mod parser;

// Chemistry
pub mod co2sys;

// Projection and orchestration
pub mod transform;

// Output
pub mod export;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ExportError, ExportResult, LoadError, LoadResult, PipelineError, PipelineResult, SolverError,
    SolverResultT,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Observation, ObservationTable, REQUIRED_COLUMNS};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{load_table, ParseResult, SourceFormat};

// =============================================================================
// Re-exports - Solver
// =============================================================================

pub use co2sys::{
    CarbonateSystem, Co2Sys, K1K2Constants, Kso4Constants, Parameter, ParameterType, PhScale,
    SolverConfig, SolverResult,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    run, solve_observations, PipelineOptions, PipelineReport, Projection, DEFAULT_INPUT_FILE,
    DEFAULT_OUTPUT_FILE, OUTPUT_COLUMNS,
};

pub use export::{write_csv, write_csv_to};
