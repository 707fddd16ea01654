use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::debug;

use super::model::{Row, Table, Value};
use crate::error::{Result, ScoreError};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a comma-separated file with a header row into a raw [`Table`].
///
/// Cells stay text except empty / `NaN` cells, which become
/// [`Value::Missing`]. Type coercion is left to the importers.
pub fn load_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| ScoreError::io(path, e))?;
    read_table(file, b',', path)
}

/// Like [`load_csv`], but honours an optional `SEP=<c>` first line.
///
/// Spreadsheet-oriented exports prepend `SEP=,` so that Excel picks the
/// right delimiter. When present, the marker line is skipped and its
/// delimiter used for the rest of the file.
pub fn load_csv_with_sep_marker(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|e| ScoreError::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut first_line = String::new();
    reader
        .read_line(&mut first_line)
        .map_err(|e| ScoreError::io(path, e))?;

    match parse_sep_marker(&first_line) {
        Some(delimiter) => {
            debug!(
                "{}: SEP marker found, delimiter {:?}",
                path.display(),
                delimiter as char
            );
            read_table(reader, delimiter, path)
        }
        None => {
            // No marker: the line we consumed is the header, so put it back.
            let chained = first_line.as_bytes().chain(reader);
            read_table(chained, b',', path)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Recognise `SEP=,` (any case, optional BOM and trailing whitespace).
fn parse_sep_marker(line: &str) -> Option<u8> {
    let line = line.trim_start_matches('\u{feff}').trim_end();
    let (key, rest) = line.split_at_checked(4)?;
    if !key.eq_ignore_ascii_case("sep=") {
        return None;
    }
    match rest.as_bytes() {
        [d] => Some(*d),
        _ => None,
    }
}

fn read_table<R: Read>(input: R, delimiter: u8, path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ScoreError::csv(path, e))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut table = Table::new(headers.clone());

    for result in reader.records() {
        let record = result.map_err(|e| ScoreError::csv(path, e))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, cell)| (col.clone(), Value::from_raw(cell)))
            .collect();
        table.push_row(row);
    }

    debug!(
        "{}: read {} rows x {} columns",
        path.display(),
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn sep_marker_detection() {
        assert_eq!(parse_sep_marker("SEP=,\n"), Some(b','));
        assert_eq!(parse_sep_marker("sep=;\r\n"), Some(b';'));
        assert_eq!(parse_sep_marker("\u{feff}SEP=,"), Some(b','));
        assert_eq!(parse_sep_marker("File name,Words"), None);
        assert_eq!(parse_sep_marker("SEP="), None);
    }

    #[test]
    fn reads_header_and_missing_cells() {
        let f = write_tmp("a,b\n1,NaN\n2,\n");
        let t = load_csv(f.path()).unwrap();
        assert_eq!(t.columns, vec!["a", "b"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0]["a"], Value::Text("1".into()));
        assert_eq!(t.rows[0]["b"], Value::Missing);
        assert_eq!(t.rows[1]["b"], Value::Missing);
    }

    #[test]
    fn marker_line_is_skipped() {
        let f = write_tmp("SEP=,\nFile name,Words\nessay1,120\n");
        let t = load_csv_with_sep_marker(f.path()).unwrap();
        assert_eq!(t.columns, vec!["File name", "Words"]);
        assert_eq!(t.rows[0]["File name"], Value::Text("essay1".into()));
    }

    #[test]
    fn header_kept_without_marker() {
        let f = write_tmp("File name,Words\nessay1,120\n");
        let t = load_csv_with_sep_marker(f.path()).unwrap();
        assert_eq!(t.columns, vec!["File name", "Words"]);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let f = write_tmp("a,b\n1,2,3\n");
        assert!(matches!(load_csv(f.path()), Err(ScoreError::Csv { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ScoreError::Io { .. }));
    }
}
