//! Source file description rendered into an `INFILE` clause.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One source file for a load run.
///
/// The path may be a concrete file, a wildcard glob, or the literal `*`
/// marker meaning "read inline BEGINDATA rows". Immutable once handed to
/// the loader; each instance renders to a single `INFILE` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFileSpec {
    pub path: String,
    #[serde(default)]
    pub bad_file: Option<String>,
    #[serde(default)]
    pub discard_file: Option<String>,
    #[serde(default)]
    pub discard_max: Option<u64>,
    /// OS-level file processing clause, e.g. `str '\r\n'`.
    #[serde(default)]
    pub os_file_proc_clause: Option<String>,
}

/// Path marker for inline BEGINDATA rows.
pub const INLINE_DATA_MARKER: &str = "*";

impl InputFileSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bad_file: None,
            discard_file: None,
            discard_max: None,
            os_file_proc_clause: None,
        }
    }

    /// The `*` spec that tells `sqlldr` to read rows after BEGINDATA.
    pub fn inline() -> Self {
        Self::new(INLINE_DATA_MARKER)
    }

    pub fn bad_file(mut self, path: impl Into<String>) -> Self {
        self.bad_file = Some(path.into());
        self
    }

    pub fn discard_file(mut self, path: impl Into<String>) -> Self {
        self.discard_file = Some(path.into());
        self
    }

    pub fn discard_max(mut self, max: u64) -> Self {
        self.discard_max = Some(max);
        self
    }

    pub fn os_file_proc_clause(mut self, clause: impl Into<String>) -> Self {
        self.os_file_proc_clause = Some(clause.into());
        self
    }

    pub fn is_inline(&self) -> bool {
        self.path == INLINE_DATA_MARKER
    }
}

impl fmt::Display for InputFileSpec {
    /// Renders the clause with its optional parts in fixed order:
    /// `INFILE '<path>' "<osProc>" BADFILE '<bad>' DISCARDFILE '<dis>' DISCARDMAX <n>`.
    ///
    /// The inline `*` marker is still quoted here; stripping the quotes is a
    /// control-file-assembly concern.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INFILE '{}'", self.path)?;

        if let Some(clause) = &self.os_file_proc_clause {
            write!(f, " \"{clause}\"")?;
        }
        if let Some(bad) = &self.bad_file {
            write!(f, " BADFILE '{bad}'")?;
        }
        if let Some(discard) = &self.discard_file {
            write!(f, " DISCARDFILE '{discard}'")?;
        }
        if let Some(max) = self.discard_max {
            write!(f, " DISCARDMAX {max}")?;
        }

        Ok(())
    }
}
