//! Core error definitions for the SQL*Loader wrapper.
//!
//! This module provides a centralized `LoaderError` enum and a `Result` type
//! used throughout the crate. A non-zero exit from the `sqlldr` binary is NOT
//! an error here: partial loads (rows rejected into bad or discard files) are
//! a normal outcome, reported through `ProcessOutput`.

use thiserror::Error;

/// Error types encountered while configuring and running a load.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Invalid load configuration, raised before any external call.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure in the process plumbing itself (spawn, pipe capture).
    #[error("Process error: {0}")]
    Process(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A result accessor was called before any `execute()` run.
    #[error("No load has been executed yet")]
    NoRunYet,
}

/// A specialized Result type for the SQL*Loader wrapper.
pub type Result<T> = std::result::Result<T, LoaderError>;
