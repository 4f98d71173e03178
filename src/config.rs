//! Application configuration: named database connections, the `sqlldr`
//! binary path, and the disk that receives generated control files.
//!
//! Loaded from a YAML or JSON file (chosen by extension) with environment
//! variable fallbacks for the usual deployment knobs.

use crate::domain::errors::{LoaderError, Result};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Credentials for one named connection. All fields are optional; absent
/// values render as empty strings in the TNS connection string.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConnectionConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Named connections, keyed by the name used in `connection`.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
    /// Default connection name.
    #[serde(default = "default_connection")]
    pub connection: String,
    /// Path to the SQL*Loader binary.
    #[serde(default = "default_binary")]
    pub sqlldr: String,
    /// Name of the disk used for generated control files.
    #[serde(default = "default_disk")]
    pub disk: String,
    /// Disk name to root directory mapping.
    #[serde(default)]
    pub disks: HashMap<String, String>,
}

fn default_connection() -> String {
    "oracle".to_string()
}

fn default_binary() -> String {
    "sqlldr".to_string()
}

fn default_disk() -> String {
    "local".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connections: HashMap::new(),
            connection: default_connection(),
            sqlldr: default_binary(),
            disk: default_disk(),
            disks: HashMap::new(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;

        let config: AppConfig = if path.ends_with(".json") {
            serde_json::from_str(&contents)
                .map_err(|e| LoaderError::Config(format!("invalid config {path}: {e}")))?
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| LoaderError::Config(format!("invalid config {path}: {e}")))?
        };

        Ok(config)
    }

    /// Applies environment overrides: `SQL_LOADER_PATH`, `SQL_LOADER_CONNECTION`,
    /// `SQL_LOADER_DISK`, and `ORACLE_PASSWORD` as a fallback password for the
    /// default connection.
    pub fn apply_env(&mut self) {
        if let Ok(binary) = std::env::var("SQL_LOADER_PATH") {
            self.sqlldr = binary;
        }
        if let Ok(connection) = std::env::var("SQL_LOADER_CONNECTION") {
            self.connection = connection;
        }
        if let Ok(disk) = std::env::var("SQL_LOADER_DISK") {
            self.disk = disk;
        }
        if let Ok(password) = std::env::var("ORACLE_PASSWORD") {
            let conn = self.connections.entry(self.connection.clone()).or_default();
            if conn.password.is_none() {
                conn.password = Some(password);
            }
        }
    }

    /// Resolves the configured disk name to its root directory.
    pub fn disk_root(&self) -> PathBuf {
        self.disks
            .get(&self.disk)
            .cloned()
            .unwrap_or_else(|| "storage".to_string())
            .into()
    }

    pub fn merge_cli(&mut self, args: &CliArgs) {
        if let Some(c) = &args.connection {
            self.connection = c.clone();
        }
        if let Some(b) = &args.binary {
            self.sqlldr = b.clone();
        }
        if let Some(d) = &args.disk {
            self.disk = d.clone();
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to the load job file (YAML or JSON)
    #[arg(short, long)]
    pub job: String,

    // Overrides for ad-hoc runs
    #[arg(long)]
    pub connection: Option<String>,
    #[arg(long)]
    pub binary: Option<String>,
    #[arg(long)]
    pub disk: Option<String>,

    /// Print the generated command and control file without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Delete generated control/log/bad/discard files after the run
    #[arg(long)]
    pub delete_files: bool,

    /// Subprocess timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}
