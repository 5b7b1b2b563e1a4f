//! Backing file location

use std::path::{Path, PathBuf};

/// Where the backing file lives: `<document_root>/<subdir>/<name>`.
///
/// `name` is the logical database name. Reopening a handle against the same
/// location always resolves to the same path, which is what lets an import
/// swap the file underneath and have the next handle see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLocation {
    document_root: PathBuf,
    subdir: String,
    name: String,
}

impl StoreLocation {
    pub const DEFAULT_SUBDIR: &'static str = "SQLite";
    pub const DEFAULT_NAME: &'static str = "names.db";

    pub fn new(document_root: impl Into<PathBuf>) -> Self {
        Self {
            document_root: document_root.into(),
            subdir: Self::DEFAULT_SUBDIR.to_string(),
            name: Self::DEFAULT_NAME.to_string(),
        }
    }

    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.subdir = subdir.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Logical database name (the backing file's name)
    pub fn logical_name(&self) -> &str {
        &self.name
    }

    /// Directory holding the backing file
    pub fn directory(&self) -> PathBuf {
        self.document_root.join(&self.subdir)
    }

    /// Full path of the backing file
    pub fn backing_path(&self) -> PathBuf {
        self.directory().join(&self.name)
    }

    /// Paths of SQLite sidecar files that belong to the backing file
    pub(crate) fn sidecar_paths(&self) -> Vec<PathBuf> {
        ["-wal", "-shm", "-journal"]
            .iter()
            .map(|suffix| self.directory().join(format!("{}{}", self.name, suffix)))
            .collect()
    }
}
