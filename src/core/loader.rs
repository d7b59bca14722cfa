use crate::core::{Cell, Table};
use crate::utils::error::{EtlError, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 讀取分隔檔為記錄表；任何讀取或解析錯誤都轉為 `LoadError`
pub struct Loader;

impl Loader {
    pub fn load_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Table> {
        let source = path.as_ref().display().to_string();
        tracing::debug!("Opening input file: {}", source);

        let result = File::open(path.as_ref())
            .map_err(EtlError::from)
            .and_then(|file| Self::read_table(file, delimiter));

        Self::report(&source, result)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
        Self::report("<reader>", Self::read_table(reader, delimiter))
    }

    fn report(source: &str, result: Result<Table>) -> Result<Table> {
        match result {
            Ok(table) => {
                tracing::info!(
                    "✅ Data loaded successfully: {} rows, {} columns",
                    table.len(),
                    table.columns().len()
                );
                Ok(table)
            }
            Err(e) => {
                tracing::error!("❌ Error loading data from {}: {}", source, e);
                Err(EtlError::LoadError {
                    path: source.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(EtlError::ValidationError {
                message: "input has no header row".to_string(),
            });
        }

        let mut table = Table::new(headers);
        for result in rdr.records() {
            let record = result?;
            table.push_row(record.iter().map(Cell::from_raw).collect())?;
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_keeps_header_and_raw_values() {
        let data = "Date, Amount ,Category\n2024-01-01,100,sales\n2024-01-02,,rent\n";
        let table = Loader::from_reader(data.as_bytes(), b',').unwrap();

        assert_eq!(table.columns(), &["Date", " Amount ", "Category"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][1], Cell::Text("100".to_string()));
        assert_eq!(table.rows()[1][1], Cell::Missing);
    }

    #[test]
    fn test_load_header_only_gives_empty_table() {
        let table = Loader::from_reader("date,amount,category\n".as_bytes(), b',').unwrap();
        assert_eq!(table.columns().len(), 3);
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_custom_delimiter() {
        let data = "date;amount\n2024-01-01;-5\n";
        let table = Loader::from_reader(data.as_bytes(), b';').unwrap();
        assert_eq!(table.columns(), &["date", "amount"]);
        assert_eq!(table.rows()[0][1], Cell::Text("-5".to_string()));
    }

    #[test]
    fn test_load_ragged_rows_is_load_error() {
        let data = "date,amount\n2024-01-01,100,extra\n";
        let err = Loader::from_reader(data.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, EtlError::LoadError { .. }));
    }

    #[test]
    fn test_load_invalid_utf8_is_load_error() {
        let data: &[u8] = b"date,amount\n2024-01-01,\xff\xfe\n";
        let err = Loader::from_reader(data, b',').unwrap_err();
        assert!(matches!(err, EtlError::LoadError { .. }));
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let err = Loader::load_path("does/not/exist.csv", b',').unwrap_err();
        match err {
            EtlError::LoadError { path, .. } => assert!(path.contains("exist.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"date,amount\n2024-03-01,42\n")
            .unwrap();

        let table = Loader::load_path(temp_file.path(), b',').unwrap();
        assert_eq!(table.len(), 1);
    }
}
