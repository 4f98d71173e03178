//! Port for persisting generated control files.

use crate::domain::errors::Result;
use std::path::PathBuf;

/// Contract for the disk that holds generated control files and, by
/// convention, the loader's sibling log/bad/discard files. Names are
/// resolved against a configured root; `path` returns the absolute form
/// handed to `sqlldr`.
pub trait StoragePort: Send + Sync {
    fn put(&self, name: &str, contents: &str) -> Result<()>;

    fn exists(&self, name: &str) -> bool;

    fn delete(&self, name: &str) -> Result<()>;

    fn path(&self, name: &str) -> PathBuf;
}
