//! Snapshot Exchange - whole-file export and import of the backing database
//!
//! The database is treated as an opaque file. Export hands the backing file
//! to a [`ShareTarget`] untouched. Import replaces the backing file with the
//! bytes of a picked file and reopens the [`StoreHandle`] so every later
//! operation sees the imported data.
//!
//! Import is staged through a temporary file in the backing directory and
//! swapped in with an atomic rename. An interrupted import therefore leaves
//! either the old file or the new file at the backing path, never a mix.

pub mod picker;
pub mod share;

use std::io::Write;
use std::path::{Path, PathBuf};
use serde::Serialize;
use tempfile::NamedTempFile;
use crate::storage::{sqlite, StoreHandle, StoreLocation};
use crate::{Error, Result};

pub use picker::{DocumentPicker, PresetPicker, PromptPicker};
pub use share::{CopyShare, ShareTarget};

/// Which step of an export or import failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExchangeReason {
    /// Export found no backing file
    FileNotFound,
    /// The picker itself failed (not a cancellation)
    Pick,
    CreateDirectory,
    Read,
    Write,
    /// The picked file is not a SQLite database
    InvalidSnapshot,
    Close,
    Reopen,
    Share,
}

impl ExchangeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeReason::FileNotFound => "file-not-found",
            ExchangeReason::Pick => "pick",
            ExchangeReason::CreateDirectory => "create-directory",
            ExchangeReason::Read => "read",
            ExchangeReason::Write => "write",
            ExchangeReason::InvalidSnapshot => "invalid-snapshot",
            ExchangeReason::Close => "close",
            ExchangeReason::Reopen => "reopen",
            ExchangeReason::Share => "share",
        }
    }
}

impl std::fmt::Display for ExchangeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an export handed off
#[derive(Debug, Clone, Serialize)]
pub struct ExportReceipt {
    pub source: PathBuf,
    pub destination: String,
    pub bytes: u64,
    pub digest: String,
}

/// What an import swapped in
#[derive(Debug, Clone, Serialize)]
pub struct ImportReceipt {
    pub source: PathBuf,
    pub bytes: u64,
    pub digest: String,
    /// Records visible through the reopened handle
    pub records: usize,
    pub generation: u64,
}

/// Result of an import attempt that did not fail
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ImportOutcome {
    Imported(ImportReceipt),
    /// The picker produced no selection; the store was not touched
    Cancelled,
}

impl ImportOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ImportOutcome::Cancelled)
    }
}

/// Run the picker step of an import, mapping picker failures to `pick`
pub fn pick_source(picker: &dyn DocumentPicker) -> Result<Option<PathBuf>> {
    picker
        .pick()
        .map_err(|e| Error::exchange_io(ExchangeReason::Pick, e))
}

/// Exports and imports the backing file of one [`StoreLocation`]
#[derive(Debug, Clone)]
pub struct SnapshotExchanger {
    location: StoreLocation,
}

impl SnapshotExchanger {
    pub fn new(location: StoreLocation) -> Self {
        Self { location }
    }

    /// Hand the backing file, byte-for-byte, to `target`
    pub fn export_snapshot(&self, target: &dyn ShareTarget) -> Result<ExportReceipt> {
        let path = self.location.backing_path();
        if !path.is_file() {
            tracing::warn!("Export requested but {} does not exist", path.display());
            return Err(Error::exchange_io(
                ExchangeReason::FileNotFound,
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no backing file at {}", path.display()),
                ),
            ));
        }

        let bytes = std::fs::read(&path).map_err(|e| Error::exchange_io(ExchangeReason::Read, e))?;
        target
            .share(&path)
            .map_err(|e| Error::exchange_io(ExchangeReason::Share, e))?;

        let receipt = ExportReceipt {
            source: path,
            destination: target.describe(),
            bytes: bytes.len() as u64,
            digest: blake3::hash(&bytes).to_hex().to_string(),
        };
        tracing::info!(
            "Exported {} bytes to {} (blake3 {})",
            receipt.bytes,
            receipt.destination,
            receipt.digest
        );
        Ok(receipt)
    }

    /// Let the user pick a snapshot and import it. A cancelled pick leaves
    /// the store untouched.
    pub fn import_snapshot(
        &self,
        handle: &mut StoreHandle,
        picker: &dyn DocumentPicker,
    ) -> Result<ImportOutcome> {
        match pick_source(picker)? {
            Some(source) => Ok(ImportOutcome::Imported(self.import_from(handle, &source)?)),
            None => {
                tracing::info!("Import cancelled, store left untouched");
                Ok(ImportOutcome::Cancelled)
            }
        }
    }

    /// Replace the backing file with the contents of `source` and reopen `handle`
    pub fn import_from(&self, handle: &mut StoreHandle, source: &Path) -> Result<ImportReceipt> {
        let directory = self.location.directory();
        std::fs::create_dir_all(&directory)
            .map_err(|e| Error::exchange_io(ExchangeReason::CreateDirectory, e))?;

        let bytes = std::fs::read(source).map_err(|e| Error::exchange_io(ExchangeReason::Read, e))?;
        if !sqlite::has_database_header(&bytes) {
            tracing::warn!("{} has no SQLite header, refusing to import", source.display());
            return Err(Error::exchange(
                ExchangeReason::InvalidSnapshot,
                format!("{} is not a SQLite database", source.display()),
            ));
        }
        let digest = blake3::hash(&bytes).to_hex().to_string();
        tracing::info!(
            "Importing {} bytes from {} (blake3 {})",
            bytes.len(),
            source.display(),
            digest
        );

        let staged = self.stage(&directory, &bytes)?;
        sqlite::probe_database(staged.path())
            .map_err(|e| Error::exchange(ExchangeReason::InvalidSnapshot, e))?;

        handle
            .close()
            .map_err(|e| Error::exchange(ExchangeReason::Close, e))?;
        for sidecar in self.location.sidecar_paths() {
            if sidecar.exists() {
                std::fs::remove_file(&sidecar).ok();
            }
        }

        let backing_path = self.location.backing_path();
        if let Err(e) = staged.persist(&backing_path) {
            tracing::error!("Failed to swap in snapshot: {}", e.error);
            // The old file is still in place; bring the handle back to it.
            handle
                .reopen()
                .map_err(|e| Error::exchange(ExchangeReason::Reopen, e))?;
            return Err(Error::exchange_io(ExchangeReason::Write, e.error));
        }
        sync_directory(&directory);

        handle
            .reopen()
            .map_err(|e| Error::exchange(ExchangeReason::Reopen, e))?;
        let records = handle
            .store_mut()
            .and_then(|store| store.count())
            .map_err(|e| Error::exchange(ExchangeReason::Reopen, e))?;

        let receipt = ImportReceipt {
            source: source.to_path_buf(),
            bytes: bytes.len() as u64,
            digest,
            records,
            generation: handle.generation(),
        };
        tracing::info!(
            "Imported snapshot with {} records (generation {})",
            receipt.records,
            receipt.generation
        );
        Ok(receipt)
    }

    /// Write `bytes` to a synced temporary file next to the backing file
    fn stage(&self, directory: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
        let write = || -> std::io::Result<NamedTempFile> {
            let mut staged = tempfile::Builder::new()
                .prefix(&format!(".{}.", self.location.logical_name()))
                .suffix(".import")
                .tempfile_in(directory)?;
            staged.write_all(bytes)?;
            staged.as_file().sync_all()?;
            Ok(staged)
        };
        write().map_err(|e| Error::exchange_io(ExchangeReason::Write, e))
    }
}

#[cfg(unix)]
fn sync_directory(directory: &Path) {
    if let Ok(dir) = std::fs::File::open(directory) {
        dir.sync_all().ok();
    }
}

#[cfg(not(unix))]
fn sync_directory(_directory: &Path) {}
