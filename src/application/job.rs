//! Declarative load job document consumed by the CLI binary.

use crate::application::loader::SqlLoader;
use crate::domain::errors::{LoaderError, Result};
use crate::domain::input_file::InputFileSpec;
use crate::domain::mode::LoadMode;
use crate::domain::table::TableLoadSpec;
use serde::Deserialize;

/// One load run described as data, deserialized from YAML or JSON.
#[derive(Debug, Deserialize)]
pub struct LoadJob {
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub input_files: Vec<InputFileSpec>,
    pub tables: Vec<TableLoadSpec>,
    #[serde(default)]
    pub mode: LoadMode,
    #[serde(default)]
    pub control_file: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub connection: Option<String>,
    #[serde(default)]
    pub begin_data: Option<Vec<Vec<String>>>,
    /// Sniff the first input file's header row for column names.
    #[serde(default)]
    pub with_headers: bool,
}

impl LoadJob {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        let job: LoadJob = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| LoaderError::Config(format!("invalid job {path}: {e}")))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| LoaderError::Config(format!("invalid job {path}: {e}")))?
        };

        Ok(job)
    }

    /// Applies this job's settings onto a loader.
    ///
    /// `with_headers` must run after the input files are registered but
    /// before tables, so empty column lists pick up the sniffed names.
    pub fn apply(self, mut loader: SqlLoader) -> Result<SqlLoader> {
        loader = loader.options(self.options).mode(self.mode);

        for file in self.input_files {
            loader = loader.in_file(file);
        }
        if self.with_headers {
            loader = loader.with_headers()?;
        }
        if let Some(name) = self.control_file {
            loader = loader.as_control_file(name);
        }
        if let Some(path) = self.log_file {
            loader = loader.logs_to(path);
        }
        if let Some(name) = self.connection {
            loader = loader.connection(name);
        }
        if let Some(rows) = self.begin_data {
            loader = loader.begin_data(rows);
        }
        for table in self.tables {
            loader = loader.into_table(table);
        }

        Ok(loader)
    }
}
