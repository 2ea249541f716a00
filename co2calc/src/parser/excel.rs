//! Workbook reader (`.xlsx`, `.xlsm`, `.xls`, `.ods`) built on calamine.
//!
//! Only the first worksheet is read; its first row is the header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::{Cell, RawTable};
use crate::error::{LoadError, LoadResult};

/// Read the first worksheet of a workbook.
pub fn read_workbook(path: &Path) -> LoadResult<RawTable> {
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::NoWorksheet(path.to_path_buf()))?
        .map_err(|e| LoadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    range_to_table(&range)
}

/// Convert a cell range into a raw table. Line numbers are 1-based sheet rows.
pub fn range_to_table(range: &Range<Data>) -> LoadResult<RawTable> {
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or(LoadError::EmptyFile)?
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let records = rows
        .enumerate()
        .map(|(idx, row)| (first_line + idx + 1, row.iter().map(to_cell).collect()))
        .collect();

    Ok(RawTable { headers, records })
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::Text(s.clone()),
        // #N/A, #DIV/0! and friends are missing values
        Data::Empty | Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::to_observations;
    use calamine::CellErrorType;
    use rust_xlsxwriter::Workbook;
    use std::io::Write;

    #[test]
    fn test_range_to_table() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("pco2".into()));
        range.set_value((0, 1), Data::String(" ph ".into()));
        range.set_value((1, 0), Data::Float(400.5));
        range.set_value((1, 1), Data::Int(8));
        range.set_value((2, 1), Data::String("7.9".into()));

        let table = range_to_table(&range).unwrap();
        assert_eq!(table.headers, vec!["pco2", "ph"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].0, 2);
        assert_eq!(table.records[0].1, vec![Cell::Number(400.5), Cell::Number(8.0)]);
        assert_eq!(table.records[1].1, vec![Cell::Empty, Cell::Text("7.9".into())]);
    }

    #[test]
    fn test_error_cells_are_empty() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("ph".into()));
        range.set_value((0, 1), Data::String("sal".into()));
        range.set_value((1, 0), Data::Error(CellErrorType::NA));
        range.set_value((1, 1), Data::Error(CellErrorType::Div0));

        let table = range_to_table(&range).unwrap();
        assert_eq!(table.records[0].1, vec![Cell::Empty, Cell::Empty]);
    }

    #[test]
    fn test_reads_first_sheet_of_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cruise.xlsx");

        let mut workbook = Workbook::new();
        let first = workbook.add_worksheet();
        first.set_name("stations").unwrap();
        for (col, name) in ["pco2", "ph", "sal", "temp"].iter().enumerate() {
            first.write_string(0, col as u16, *name).unwrap();
        }
        let rows = [[400.0, 8.0, 32.0, 15.0], [512.5, 7.85, 31.2, 12.4]];
        for (r, values) in rows.iter().enumerate() {
            for (c, value) in values.iter().enumerate() {
                first.write_number(r as u32 + 1, c as u16, *value).unwrap();
            }
        }
        let second = workbook.add_worksheet();
        second.set_name("notes").unwrap();
        second.write_string(0, 0, "comment").unwrap();
        workbook.save(&path).unwrap();

        let table = read_workbook(&path).unwrap();
        assert_eq!(table.headers, vec!["pco2", "ph", "sal", "temp"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].0, 2);
        assert_eq!(table.records[1].0, 3);
        assert_eq!(
            table.records[1].1,
            vec![
                Cell::Number(512.5),
                Cell::Number(7.85),
                Cell::Number(31.2),
                Cell::Number(12.4)
            ]
        );
    }

    #[test]
    fn test_sheet_starting_below_first_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in ["pco2", "ph", "sal", "temp"].iter().enumerate() {
            sheet.write_string(2, col as u16, *name).unwrap();
        }
        sheet.write_number(3, 0, 400.0).unwrap();
        sheet.write_string(3, 1, "NA").unwrap();
        sheet.write_number(3, 2, 32.0).unwrap();
        sheet.write_number(3, 3, 15.0).unwrap();
        sheet.write_number(4, 0, 410.0).unwrap();
        sheet.write_string(4, 1, "high").unwrap();
        sheet.write_number(4, 2, 32.0).unwrap();
        sheet.write_number(4, 3, 15.0).unwrap();
        workbook.save(&path).unwrap();

        let table = read_workbook(&path).unwrap();
        assert_eq!(table.headers, vec!["pco2", "ph", "sal", "temp"]);
        assert_eq!(table.records[0].0, 4);
        assert_eq!(table.records[1].0, 5);

        let err = to_observations(&table, true).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidValue { line: 5, ref value, .. } if value == "high"
        ));
    }

    #[test]
    fn test_missing_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_workbook(&dir.path().join("absent.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_corrupt_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"this is not a zip archive").unwrap();

        let err = read_workbook(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Workbook { .. }));
    }
}
