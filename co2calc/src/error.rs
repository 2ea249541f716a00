//! Error types for the co2calc pipeline.
//!
//! One enum per stage, plus a top-level enum that wraps them:
//!
//! - [`LoadError`] - reading the observation table
//! - [`SolverError`] - solving the carbonate system
//! - [`ExportError`] - writing the output table
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Conversion is automatic via `From` implementations, so `?` works across
//! stage boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::co2sys::ParameterType;

// =============================================================================
// Loader Errors
// =============================================================================

/// Errors while reading the observation table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook could not be opened or its sheet could not be read.
    #[error("Failed to read workbook '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// The workbook has no worksheet.
    #[error("Workbook '{0}' has no worksheet")]
    NoWorksheet(PathBuf),

    /// Text decoding failed.
    #[error("Failed to decode content as {encoding}: {message}")]
    Encoding { encoding: String, message: String },

    /// A record the delimited reader could not parse.
    #[error("Line {line}: malformed record: {message}")]
    Csv { line: usize, message: String },

    /// Empty file.
    #[error("Table is empty: no header row")]
    EmptyFile,

    /// A required column is absent from the header row.
    #[error("Missing column '{column}' (found: {})", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A cell in a required column is not a number.
    #[error("Line {line}, column '{column}' (value '{value}'): not a number")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    /// File extension is not a known table format.
    #[error("Unsupported table format: '{0}'")]
    UnsupportedFormat(PathBuf),
}

// =============================================================================
// Solver Errors
// =============================================================================

/// Errors from the carbonate-system solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// A CO2SYS selector code this solver does not implement.
    #[error("Unsupported {option} code: {code}")]
    UnsupportedOption { option: &'static str, code: i32 },

    /// The two input parameters do not determine the system.
    #[error("Invalid input pair: {first:?} and {second:?}")]
    InvalidPair {
        first: ParameterType,
        second: ParameterType,
    },

    /// An input value outside the domain of the equations.
    #[error("Invalid {parameter}: {value}")]
    InvalidInput { parameter: &'static str, value: f64 },

    /// Input values that describe no physical carbonate system.
    #[error("Unphysical input: {0}")]
    Unphysical(String),

    /// The pH iteration did not settle.
    #[error("pH iteration did not converge after {iterations} iterations (last pH {ph})")]
    NoConvergence { iterations: usize, ph: f64 },

    /// Input series of different lengths.
    #[error("Series '{series}' has {found} values, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        found: usize,
    },

    /// A failure on one row of a table solve.
    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<SolverError>,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the output table.
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error.
    #[error("Output IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loader error.
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Solver error.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Writer error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for solver operations.
pub type SolverResultT<T> = Result<T, SolverError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // LoadError -> PipelineError
        let load_err = LoadError::EmptyFile;
        let pipeline_err: PipelineError = load_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // SolverError -> PipelineError
        let solver_err = SolverError::InvalidInput {
            parameter: "salinity",
            value: -1.0,
        };
        let pipeline_err: PipelineError = solver_err.into();
        assert!(pipeline_err.to_string().contains("salinity"));
    }

    #[test]
    fn test_missing_column_lists_available() {
        let err = LoadError::MissingColumn {
            column: "pco2".into(),
            available: vec!["ph".into(), "sal".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'pco2'"));
        assert!(msg.contains("ph, sal"));
    }

    #[test]
    fn test_invalid_value_format() {
        let err = LoadError::InvalidValue {
            line: 5,
            column: "temp".into(),
            value: "warm".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Line 5"));
        assert!(msg.contains("column 'temp'"));
        assert!(msg.contains("value 'warm'"));
    }

    #[test]
    fn test_row_error_wraps_source() {
        let err = SolverError::Row {
            row: 3,
            source: Box::new(SolverError::NoConvergence {
                iterations: 100,
                ph: 7.5,
            }),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Row 3"));
        assert!(msg.contains("did not converge"));
    }
}
