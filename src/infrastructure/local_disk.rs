//! Infrastructure adapter for storing control files on the local filesystem.

use crate::domain::errors::Result;
use crate::ports::StoragePort;
use std::fs;
use std::path::PathBuf;

/// Concrete `StoragePort` over a single root directory.
///
/// The root is created lazily on the first `put`; `path` resolves names to
/// absolute paths when the root itself is absolute.
pub struct LocalDiskAdapter {
    root: PathBuf,
}

impl LocalDiskAdapter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn full_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl StoragePort for LocalDiskAdapter {
    fn put(&self, name: &str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.full_path(name), contents)?;
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.full_path(name).exists()
    }

    fn delete(&self, name: &str) -> Result<()> {
        fs::remove_file(self.full_path(name))?;
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.full_path(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_exists_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let disk = LocalDiskAdapter::new(dir.path().join("ctl"));

        assert!(!disk.exists("users.ctl"));
        disk.put("users.ctl", "LOAD DATA\n").unwrap();
        assert!(disk.exists("users.ctl"));
        assert_eq!(
            fs::read_to_string(disk.path("users.ctl")).unwrap(),
            "LOAD DATA\n"
        );

        disk.delete("users.ctl").unwrap();
        assert!(!disk.exists("users.ctl"));
    }

    #[test]
    fn path_is_rooted() {
        let disk = LocalDiskAdapter::new("/var/sqlloader");
        assert_eq!(
            disk.path("users.ctl"),
            PathBuf::from("/var/sqlloader/users.ctl")
        );
    }
}
