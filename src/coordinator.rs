//! Coordinator - the single owner of the store handle
//!
//! Lifecycle is `init → [close → reopen]* → teardown`. Only the import path
//! closes and reopens the handle; everything else borrows the open store.

use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::exchange::{DocumentPicker, ExportReceipt, ImportOutcome, ImportReceipt, ShareTarget, SnapshotExchanger};
use crate::record::NameRecord;
use crate::storage::{StoreHandle, StoreLocation};
use crate::Result;

/// Owns the one [`StoreHandle`] and the [`SnapshotExchanger`] for its file
pub struct Coordinator {
    handle: StoreHandle,
    exchanger: SnapshotExchanger,
}

impl Coordinator {
    /// Open the store at `location`, creating the directory and schema if needed
    pub fn init(location: StoreLocation) -> Result<Self> {
        let handle = StoreHandle::open(location.clone())?;
        let exchanger = SnapshotExchanger::new(location);
        Ok(Self { handle, exchanger })
    }

    pub fn location(&self) -> &StoreLocation {
        self.handle.location()
    }

    pub fn list_all(&mut self) -> Result<Vec<NameRecord>> {
        self.handle.store_mut()?.list_all()
    }

    pub fn insert(&mut self, name: &str) -> Result<NameRecord> {
        self.handle.store_mut()?.insert(name)
    }

    pub fn update(&mut self, id: i64, name: &str) -> Result<bool> {
        self.handle.store_mut()?.update(id, name)
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        self.handle.store_mut()?.delete(id)
    }

    pub fn export_snapshot(&self, target: &dyn ShareTarget) -> Result<ExportReceipt> {
        self.exchanger.export_snapshot(target)
    }

    pub fn import_snapshot(&mut self, picker: &dyn DocumentPicker) -> Result<ImportOutcome> {
        self.exchanger.import_snapshot(&mut self.handle, picker)
    }

    pub fn import_from(&mut self, source: &Path) -> Result<ImportReceipt> {
        self.exchanger.import_from(&mut self.handle, source)
    }

    pub fn stats(&mut self) -> Result<StoreStats> {
        let backing_path = self.location().backing_path();
        let backing_bytes = std::fs::metadata(&backing_path).map(|m| m.len()).ok();
        let generation = self.handle.generation();
        let records = self.handle.store_mut()?.count()?;
        Ok(StoreStats {
            records,
            backing_path,
            backing_bytes,
            generation,
        })
    }

    /// Close the handle for good
    pub fn teardown(mut self) -> Result<()> {
        self.handle.close()
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub records: usize,
    pub backing_path: PathBuf,
    pub backing_bytes: Option<u64>,
    /// Number of times the handle has been opened
    pub generation: u64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Store Statistics:")?;
        writeln!(f, "  Records: {}", self.records)?;
        writeln!(f, "  Backing file: {}", self.backing_path.display())?;
        match self.backing_bytes {
            Some(bytes) => writeln!(f, "  Size: {} bytes", bytes)?,
            None => writeln!(f, "  Size: -")?,
        }
        write!(f, "  Handle generation: {}", self.generation)
    }
}
