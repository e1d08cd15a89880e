//! Raw CSV tables.
//!
//! The first non-blank row is the header. Data rows are padded or truncated
//! to the header width, so a ragged file still yields a rectangular table.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn check_headers(headers: &[String], path: &Path) -> Result<()> {
    let mut seen = BTreeSet::new();
    for (index, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
                index,
            });
        }
        if !seen.insert(header.as_str()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: header.clone(),
            });
        }
    }
    Ok(())
}

/// Reads the CSV file at `path`.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    read_csv_from(file, path)
}

/// Reads CSV text from `input`; `path` only labels errors.
pub fn read_csv_from<R: Read>(input: R, path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        raw_rows.push(row);
    }

    let mut raw_rows = raw_rows.into_iter();
    let Some(header_row) = raw_rows.next() else {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    };
    let headers: Vec<String> = header_row.iter().map(|value| normalize_header(value)).collect();
    check_headers(&headers, path)?;

    let rows = raw_rows
        .map(|mut row| {
            row.resize(headers.len(), String::new());
            row
        })
        .collect();
    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<CsvTable> {
        read_csv_from(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_headers_and_cells_are_trimmed() {
        let table = parse("\u{feff} pmid ,  kcat   value\n 1 , 33 s^-1 \n").unwrap();
        assert_eq!(table.headers, vec!["pmid", "kcat value"]);
        assert_eq!(table.rows, vec![vec!["1", "33 s^-1"]]);
    }

    #[test]
    fn test_ragged_rows_are_squared() {
        let table = parse("a,b,c\n1\n1,2,3,4\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let table = parse("\n,,\na,b\n,\n1,2\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_invalid_headers() {
        assert!(matches!(parse(""), Err(IngestError::EmptyCsv { .. })));
        assert!(matches!(
            parse("a,,b\n1,2,3\n"),
            Err(IngestError::EmptyColumnName { index: 1, .. })
        ));
        assert!(matches!(
            parse("kcat, kcat\n1,2\n"),
            Err(IngestError::DuplicateColumn { ref column, .. }) if column == "kcat"
        ));
    }
}
