//! Load method selection for the generated control file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How `sqlldr` should place rows into the target tables.
///
/// `Insert` is never emitted literally: SQL*Loader rejects a bare INSERT
/// unless the table is empty, so the builder substitutes TRUNCATE to keep
/// the "insert-only" intent safe. See [`LoadMode::method`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadMode {
    Insert,
    #[default]
    Append,
    Replace,
    Truncate,
}

impl LoadMode {
    /// The literal keyword for this mode.
    pub fn keyword(self) -> &'static str {
        match self {
            LoadMode::Insert => "INSERT",
            LoadMode::Append => "APPEND",
            LoadMode::Replace => "REPLACE",
            LoadMode::Truncate => "TRUNCATE",
        }
    }

    /// The mode actually rendered into the control file.
    ///
    /// Exhaustive on purpose: a new variant must decide its normalization
    /// here before the crate compiles again.
    pub fn method(self) -> LoadMode {
        match self {
            LoadMode::Insert => LoadMode::Truncate,
            LoadMode::Append => LoadMode::Append,
            LoadMode::Replace => LoadMode::Replace,
            LoadMode::Truncate => LoadMode::Truncate,
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
