//! Port for sniffing header rows out of delimited source files.

use crate::domain::errors::Result;

/// Reads the first row of a delimited file, used only for column-name
/// inference via `SqlLoader::with_headers`.
pub trait CsvPort: Send + Sync {
    fn read_header_row(&self, path: &str) -> Result<Vec<String>>;
}
