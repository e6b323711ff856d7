use crate::error::{EtlError, Result};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A delimited file exactly as read: header names plus rows of raw strings,
/// before any type inference.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Where the rows came from, used in error messages.
    pub source: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EtlError::missing_column(self.source.clone(), name))
    }

    /// All cells of column `idx`, in row order.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().map(move |r| r[idx].as_str())
    }
}

/// Reads a comma-separated file with a header row.
pub fn read_csv(path: &Path) -> Result<RawTable> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| EtlError::csv(path, e))?;
    let table = collect_records(reader, &path.display().to_string())
        .map_err(|e| EtlError::csv(path, e))?;
    debug!(
        "Read {} rows x {} columns from {}",
        table.rows.len(),
        table.headers.len(),
        table.source
    );
    Ok(table)
}

/// Reads CSV text from any reader; `source` names it in errors.
pub fn read_csv_from<R: Read>(rdr: R, source: &str) -> Result<RawTable> {
    let reader = ReaderBuilder::new().has_headers(true).from_reader(rdr);
    collect_records(reader, source).map_err(|e| EtlError::csv(source, e))
}

fn collect_records<R: Read>(
    mut reader: csv::Reader<R>,
    source: &str,
) -> std::result::Result<RawTable, csv::Error> {
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable {
        source: source.to_string(),
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_headers_and_rows() {
        let table = read_csv_from(
            "id,message,original\n1,Help,\n2,\"Food, water\",Nourriture\n".as_bytes(),
            "messages.csv",
        )
        .unwrap();

        assert_eq!(table.headers, vec!["id", "message", "original"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], "Food, water");
        assert_eq!(table.rows[0][2], "");
        assert_eq!(table.column_cells(0).collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn missing_column_names_the_file() {
        let table = read_csv_from("key,message\n1,Help\n".as_bytes(), "messages.csv").unwrap();
        match table.require_column("id") {
            Err(EtlError::MissingColumn { file, column }) => {
                assert_eq!(file, "messages.csv");
                assert_eq!(column, "id");
            }
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn ragged_rows_are_a_csv_error() {
        let err = read_csv_from("id,message\n1,Help,extra\n".as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, EtlError::Csv { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn reads_from_disk() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "id,categories")?;
        writeln!(file, "1,related-1;offer-0")?;

        let table = read_csv(file.path())?;
        assert_eq!(table.rows, vec![vec!["1".to_string(), "related-1;offer-0".to_string()]]);
        Ok(())
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = read_csv(Path::new("/nonexistent/messages.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/messages.csv"));
    }
}
