//! Observation table loader.
//!
//! Reads a workbook or delimited text file, takes the first row as the
//! header, and extracts the `pco2`, `ph`, `sal` and `temp` columns as
//! numbers. Row order and count are preserved; empty cells, spreadsheet
//! error cells and the usual NA markers become NaN.

pub mod delimited;
pub mod excel;

use std::path::Path;

use serde::Serialize;

use crate::error::{LoadError, LoadResult};
use crate::models::{Observation, ObservationTable, REQUIRED_COLUMNS};

/// Text cells read as a missing value, as pandas does by default.
pub const NA_TOKENS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// One cell as it came out of the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

/// Header plus `(line, cells)` records, before column resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<(usize, Vec<Cell>)>,
}

/// Kind of file the table was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SourceFormat {
    Workbook,
    Delimited { encoding: String, delimiter: char },
}

/// Result of loading with metadata
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub table: ObservationTable,
    /// Column headers, in file order
    pub headers: Vec<String>,
    pub format: SourceFormat,
}

/// Load an observation table, dispatching on the file extension.
pub fn load_table<P: AsRef<Path>>(path: P) -> LoadResult<ParseResult> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let (raw, format) = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => {
            (excel::read_workbook(path)?, SourceFormat::Workbook)
        }
        "csv" | "tsv" | "txt" => {
            let (raw, meta) = delimited::read_delimited(path)?;
            let format = SourceFormat::Delimited {
                encoding: meta.encoding,
                delimiter: meta.delimiter as char,
            };
            (raw, format)
        }
        _ => return Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    };

    let decimal_comma = !matches!(format, SourceFormat::Delimited { delimiter: ',', .. });
    let table = to_observations(&raw, decimal_comma)?;
    Ok(ParseResult {
        table,
        headers: raw.headers,
        format,
    })
}

/// Resolve the required columns and coerce their cells to numbers.
pub fn to_observations(raw: &RawTable, decimal_comma: bool) -> LoadResult<ObservationTable> {
    let [pco2, ph, sal, temp] = resolve_columns(&raw.headers)?;

    let rows = raw
        .records
        .iter()
        .map(|(line, cells)| -> LoadResult<Observation> {
            let value =
                |idx: usize| coerce(cells.get(idx), *line, &raw.headers[idx], decimal_comma);
            Ok(Observation::new(value(pco2)?, value(ph)?, value(sal)?, value(temp)?))
        })
        .collect::<LoadResult<Vec<_>>>()?;

    Ok(ObservationTable::new(rows))
}

/// Index of each required column. Matching ignores case and surrounding
/// whitespace; the first matching header wins.
fn resolve_columns(headers: &[String]) -> LoadResult<[usize; 4]> {
    let mut indices = [0usize; 4];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| LoadError::MissingColumn {
                column: column.to_string(),
                available: headers.to_vec(),
            })?;
    }
    Ok(indices)
}

fn coerce(cell: Option<&Cell>, line: usize, column: &str, decimal_comma: bool) -> LoadResult<f64> {
    let text = match cell {
        Some(Cell::Number(n)) => return Ok(*n),
        Some(Cell::Empty) | None => return Ok(f64::NAN),
        Some(Cell::Text(text)) => text.trim(),
    };
    if NA_TOKENS.contains(&text) {
        return Ok(f64::NAN);
    }

    let normalized = if decimal_comma && !text.contains('.') {
        text.replacen(',', ".", 1)
    } else {
        text.to_string()
    };

    normalized.parse::<f64>().map_err(|_| LoadError::InvalidValue {
        line,
        column: column.trim().to_string(),
        value: text.to_string(),
    })
}
