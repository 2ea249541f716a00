//! Delimited text reader with encoding and delimiter auto-detection.

use std::path::Path;

use super::{Cell, RawTable};
use crate::error::{LoadError, LoadResult};

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> LoadResult<String> {
    let encoding_error = |message: String| LoadError::Encoding {
        encoding: encoding.to_string(),
        message,
    };

    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => {
            let text = std::str::from_utf8(bytes).map_err(|e| encoding_error(e.to_string()))?;
            Ok(text.trim_start_matches('\u{feff}').to_string())
        }
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.into_owned())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Detect the delimiter by counting occurrences in the first line.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;
    for sep in [b';', b',', b'\t', b'|'] {
        let count = first_line.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }
    best
}

/// Read a delimited text file.
pub fn read_delimited(path: &Path) -> LoadResult<(RawTable, DelimitedMeta)> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bytes_auto(&bytes)
}

/// What auto-detection settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedMeta {
    pub encoding: String,
    pub delimiter: u8,
}

/// Parse bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> LoadResult<(RawTable, DelimitedMeta)> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    let table = parse_str(&content, delimiter)?;
    Ok((table, DelimitedMeta { encoding, delimiter }))
}

/// Parse text with an explicit delimiter. Blank lines are skipped.
pub fn parse_str(content: &str, delimiter: u8) -> LoadResult<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result.map_err(record_error)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        match headers {
            None => headers = Some(record.iter().map(str::to_string).collect()),
            Some(_) => {
                let cells = record
                    .iter()
                    .map(|value| {
                        if value.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(value.to_string())
                        }
                    })
                    .collect();
                records.push((line, cells));
            }
        }
    }

    let headers = headers.ok_or(LoadError::EmptyFile)?;
    Ok(RawTable { headers, records })
}

fn record_error(e: csv::Error) -> LoadError {
    LoadError::Csv {
        line: e.position().map(|p| p.line() as usize).unwrap_or(0),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_csv() {
        let table = parse_str("pco2;ph\n400;8.0\n410;7.9", b';').unwrap();

        assert_eq!(table.headers, vec!["pco2", "ph"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].1[0], Cell::Text("400".into()));
        assert_eq!(table.records[1].1[1], Cell::Text("7.9".into()));
    }

    #[test]
    fn test_quoted_values() {
        let table = parse_str("\"pco2\",\"ph\"\n\"400\",\"8.0\"", b',').unwrap();
        assert_eq!(table.headers, vec!["pco2", "ph"]);
        assert_eq!(table.records[0].1[1], Cell::Text("8.0".into()));
    }

    #[test]
    fn test_blank_lines_skipped_line_numbers_kept() {
        let table = parse_str("a,b\n1,2\n\n3,4\n", b',').unwrap();

        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].0, 2);
        assert_eq!(table.records[1].0, 4);
    }

    #[test]
    fn test_empty_cells() {
        let table = parse_str("a;b;c\n1;;3", b';').unwrap();
        assert_eq!(table.records[0].1[1], Cell::Empty);
    }

    #[test]
    fn test_empty_content_error() {
        assert!(matches!(parse_str("", b','), Err(LoadError::EmptyFile)));
        assert!(matches!(parse_str("\n\n", b','), Err(LoadError::EmptyFile)));
    }

    #[test]
    fn test_record_error_keeps_line() {
        let bytes: &[u8] = b"pco2,ph\n400,8.0\n410,\xff\n";
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes);
        let err = reader.records().find_map(Result::err).unwrap();

        match record_error(err) {
            LoadError::Csv { line, message } => {
                assert_eq!(line, 3);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), b'\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), b'|');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_auto_parse() {
        let (table, meta) = parse_bytes_auto(b"pco2;ph;sal;temp\n400;8,0;32;15").unwrap();

        assert_eq!(meta.delimiter, b';');
        assert_eq!(meta.encoding, "utf-8");
        assert_eq!(table.headers, vec!["pco2", "ph", "sal", "temp"]);
        assert_eq!(table.records[0].1[1], Cell::Text("8,0".into()));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Salinité" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x61, 0x6C, 0x69, 0x6E, 0x69, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert_eq!(decoded, "Salinité");
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let decoded = decode_content(b"\xef\xbb\xbfpco2,ph", "utf-8").unwrap();
        assert_eq!(decoded, "pco2,ph");
    }
}
