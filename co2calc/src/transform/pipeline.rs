//! High-level pipeline API: observation table in, carbonate chemistry CSV out.
//!
//! ```text
//! load_table ──▶ Co2Sys::solve_table ──▶ Projection ──▶ write_csv
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use co2calc::transform::pipeline::{run, PipelineOptions};
//!
//! let report = run(&PipelineOptions::default())?;
//! println!("Wrote {} rows to {}", report.row_count, report.output.display());
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::projection::Projection;
use crate::co2sys::{Co2Sys, SolverConfig, SolverResult};
use crate::error::{PipelineResult, SolverResultT};
use crate::export::write_csv;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::ObservationTable;
use crate::parser::{load_table, SourceFormat};

/// Workbook the reference run reads, one directory up.
pub const DEFAULT_INPUT_FILE: &str = "CMS1DataFALL2016.xlsx";

/// File the reference run writes in the working directory.
pub const DEFAULT_OUTPUT_FILE: &str = "focbco2sys_out.csv";

/// Options for the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("..").join(DEFAULT_INPUT_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            solver: SolverConfig::default(),
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub row_count: usize,
    /// Rows with a missing input, written as `nan`
    pub missing_rows: usize,
    pub headers: Vec<String>,
    pub output: PathBuf,
}

/// Load, solve, project and write.
pub fn run(options: &PipelineOptions) -> PipelineResult<PipelineReport> {
    log_info(format!("Reading {}", options.input.display()));
    let parsed = load_table(&options.input)?;
    if let SourceFormat::Delimited { encoding, delimiter } = &parsed.format {
        log_success(format!("Detected encoding: {}", encoding));
        log_success(format!("Detected separator: '{}'", format_delimiter(*delimiter)));
    }
    log_success(format!("Read {} rows", parsed.table.len()));
    log_info(format!("Table has {} columns:", parsed.headers.len()));
    for (i, col) in parsed.headers.iter().enumerate() {
        log_info_indent(format!("[{:2}] {}", i + 1, col), 1);
    }

    let missing_rows = parsed.table.missing_count();
    if missing_rows > 0 {
        log_warning(format!(
            "{} rows have missing values and will be written as nan",
            missing_rows
        ));
    }

    let solver = &options.solver;
    log_info(format!(
        "Solving carbonate system (pH scale {}, K1/K2: {})",
        solver.ph_scale.label(),
        solver.k1k2.citation()
    ));
    let result = solve_observations(&parsed.table, solver)?;
    log_success(format!("Solved {} rows", result.len()));

    let projection = Projection::from_result(&result);
    write_csv(&projection, &options.output)?;
    log_success(format!("Wrote {}", options.output.display()));

    Ok(PipelineReport {
        row_count: projection.len(),
        missing_rows,
        headers: parsed.headers,
        output: options.output.clone(),
    })
}

/// Solve every observation, with the sample temperature used for both the
/// input and output conditions.
pub fn solve_observations(
    table: &ObservationTable,
    config: &SolverConfig,
) -> SolverResultT<SolverResult> {
    let temp = table.temp();
    Co2Sys::new(*config)?.solve_table(&table.pco2(), &table.ph(), &table.sal(), &temp, &temp)
}

/// Format delimiter for display
fn format_delimiter(d: char) -> &'static str {
    match d {
        ';' => ";",
        ',' => ",",
        '\t' => "TAB",
        '|' => "|",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::co2sys::{Parameter, PhScale};
    use crate::error::PipelineError;
    use approx::assert_abs_diff_eq;
    use std::fs;

    const HEADER: &str = "omega_a,omega_c,ta,dic,ph_tot";

    fn options(dir: &tempfile::TempDir, input: &str) -> PipelineOptions {
        let input_path = dir.path().join("obs.csv");
        fs::write(&input_path, input).unwrap();
        PipelineOptions {
            input: input_path,
            output: dir.path().join(DEFAULT_OUTPUT_FILE),
            solver: SolverConfig::default(),
        }
    }

    #[test]
    fn test_one_line_per_row_plus_header() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(
            &dir,
            "pco2,ph,sal,temp\n400,8.0,32,15\n450,7.95,31.5,14\n380,8.05,33,16\n",
        );

        let report = run(&opts).unwrap();
        assert_eq!(report.row_count, 3);

        let text = fs::read_to_string(&opts.output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER);
        assert!(text.ends_with('\n'));
        assert!(!text.contains('\r'));
    }

    #[test]
    fn test_header_only_input() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "pco2,ph,sal,temp\n");

        let report = run(&opts).unwrap();
        assert_eq!(report.row_count, 0);
        assert_eq!(fs::read_to_string(&opts.output).unwrap(), format!("{}\n", HEADER));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "pco2,ph,sal,temp\n400,8.0,32,15\n1200,7.6,30,9\n");

        run(&opts).unwrap();
        let first = fs::read(&opts.output).unwrap();
        run(&opts).unwrap();
        let second = fs::read(&opts.output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ph_scale_changes_ph_tot() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir, "pco2,ph,sal,temp\n400,8.0,32,15\n");

        let ph_tot = |opts: &PipelineOptions| -> f64 {
            run(opts).unwrap();
            let text = fs::read_to_string(&opts.output).unwrap();
            let row = text.lines().nth(1).unwrap();
            row.split(',').nth(4).unwrap().parse().unwrap()
        };

        opts.solver = SolverConfig::default().with_ph_scale(PhScale::Total);
        let total = ph_tot(&opts);
        opts.solver = SolverConfig::default().with_ph_scale(PhScale::Nbs);
        let nbs = ph_tot(&opts);

        assert_abs_diff_eq!(total, 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(nbs, 7.88037, epsilon = 1e-4);
    }

    #[test]
    fn test_output_rows_follow_input_rows() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "pco2,ph,sal,temp\n300,8.2,34,20\n,8.0,32,15\n900,7.6,30,5\n");

        let report = run(&opts).unwrap();
        assert_eq!(report.missing_rows, 1);

        let parsed = load_table(&opts.input).unwrap();
        let result = solve_observations(&parsed.table, &opts.solver).unwrap();
        let ta = result.series(Parameter::Alkalinity);

        let text = fs::read_to_string(&opts.output).unwrap();
        let written: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(2).unwrap())
            .collect();
        assert_eq!(written[0].parse::<f64>().unwrap(), ta[0]);
        assert_eq!(written[1], "nan");
        assert_eq!(written[2].parse::<f64>().unwrap(), ta[2]);
    }

    #[test]
    fn test_workbook_with_na_marker() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cruise.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in ["pco2", "ph", "sal", "temp"].iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        for (col, value) in [400.0, 8.0, 32.0, 15.0].iter().enumerate() {
            sheet.write_number(1, col as u16, *value).unwrap();
        }
        sheet.write_number(2, 0, 410.0).unwrap();
        sheet.write_string(2, 1, "NA").unwrap();
        sheet.write_number(2, 2, 32.0).unwrap();
        sheet.write_number(2, 3, 15.0).unwrap();
        workbook.save(&input).unwrap();

        let opts = PipelineOptions {
            input,
            output: dir.path().join(DEFAULT_OUTPUT_FILE),
            solver: SolverConfig::default(),
        };
        let report = run(&opts).unwrap();
        assert_eq!(report.row_count, 2);
        assert_eq!(report.missing_rows, 1);

        let text = fs::read_to_string(&opts.output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HEADER);
        assert!(!lines[1].contains("nan"));
        assert_eq!(lines[2], "nan,nan,nan,nan,nan");
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let opts = PipelineOptions {
            input: dir.path().join("absent.xlsx"),
            output: dir.path().join(DEFAULT_OUTPUT_FILE),
            solver: SolverConfig::default(),
        };

        let err = run(&opts).unwrap_err();
        assert!(matches!(err, PipelineError::Load(_)));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_missing_column_aborts_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "pco2,ph,temp\n400,8.0,15\n");

        assert!(matches!(run(&opts), Err(PipelineError::Load(_))));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_solver_error_aborts_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir, "pco2,ph,sal,temp\n400,8.0,-3,15\n");

        assert!(matches!(run(&opts), Err(PipelineError::Solver(_))));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_default_paths() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.input, PathBuf::from("../CMS1DataFALL2016.xlsx"));
        assert_eq!(opts.output, PathBuf::from("focbco2sys_out.csv"));
        assert_eq!(opts.solver.ph_scale, PhScale::Nbs);
    }
}
