//! CSV writer for the projected output table.
//!
//! Comma-delimited, `\n`-terminated, header first. The target file is
//! created fresh on every write. Numbers follow Python's float `repr`:
//! shortest round-trip digits, a trailing `.0` on integral values and
//! exponent notation outside `1e-4 <= |x| < 1e16`. NaN is written as `nan`.

use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::ExportResult;
use crate::transform::projection::Projection;

/// Write the projection to `path`, truncating any existing file.
pub fn write_csv<P: AsRef<Path>>(projection: &Projection, path: P) -> ExportResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_csv_to(projection, file)
}

/// Write the projection to any writer.
pub fn write_csv_to<W: Write>(projection: &Projection, out: W) -> ExportResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(&projection.headers)?;
    for row in &projection.rows {
        writer.write_record(row.iter().map(|v| format_value(*v)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Render one number.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "-1.317e-5"
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    // Position of the decimal point relative to the first digit
    let point = exponent + 1;

    if point <= -4 || point > 16 {
        let (first, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() { String::new() } else { format!(".{}", rest) };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}{}{}e{}{:02}", sign, first, fraction, exp_sign, exponent.abs());
    }

    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat(point.unsigned_abs() as usize), digits)
    } else if point as usize >= digits.len() {
        format!("{}{}.0", digits, "0".repeat(point as usize - digits.len()))
    } else {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    };
    format!("{}{}", sign, body)
}
