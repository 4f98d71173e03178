//! Infrastructure adapter for header sniffing via the `csv` crate.

use crate::domain::errors::Result;
use crate::ports::CsvPort;

/// Concrete `CsvPort` reading the first record of a comma-delimited file.
#[derive(Debug, Default)]
pub struct CsvHeaderAdapter;

impl CsvHeaderAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl CsvPort for CsvHeaderAdapter {
    fn read_header_row(&self, path: &str) -> Result<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_first_row_as_headers() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,name,email").unwrap();
        writeln!(file, "1,Jane,jane@example.com").unwrap();

        let headers = CsvHeaderAdapter::new()
            .read_header_row(file.path().to_str().unwrap())
            .unwrap();
        assert_eq!(headers, vec!["id", "name", "email"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = CsvHeaderAdapter::new().read_header_row("/no/such/file.csv");
        assert!(result.is_err());
    }
}
