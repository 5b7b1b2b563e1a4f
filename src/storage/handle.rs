//! Store handle lifecycle
//!
//! `Closed → Open` on open or reopen, `Open → Closed` on close. Only the
//! snapshot exchanger closes a handle, and it reopens immediately afterwards.

use crate::{Error, Result};
use super::{NameStore, StoreLocation};

/// Current state of the one connection to the backing file
pub enum HandleState {
    Open(NameStore),
    Closed,
}

/// The process-wide connection to the backing file.
///
/// Owned by a single coordinator and passed by reference to whatever needs
/// it. `generation` counts successful opens, so a caller can tell that a
/// reopen happened.
pub struct StoreHandle {
    location: StoreLocation,
    state: HandleState,
    generation: u64,
}

impl StoreHandle {
    /// Create the backing directory if needed, connect, and ensure the schema
    pub fn open(location: StoreLocation) -> Result<Self> {
        let mut handle = Self {
            location,
            state: HandleState::Closed,
            generation: 0,
        };
        handle.reopen()?;
        Ok(handle)
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, HandleState::Open(_))
    }

    /// The open store, or `HandleClosed` if the handle is between close and reopen
    pub fn store_mut(&mut self) -> Result<&mut NameStore> {
        match &mut self.state {
            HandleState::Open(store) => Ok(store),
            HandleState::Closed => Err(Error::HandleClosed),
        }
    }

    /// Close the connection. Closing an already closed handle is a no-op.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, HandleState::Closed) {
            HandleState::Open(store) => {
                store.close()?;
                tracing::info!(
                    "Closed store handle {} (generation {})",
                    self.location.backing_path().display(),
                    self.generation
                );
                Ok(())
            }
            HandleState::Closed => Ok(()),
        }
    }

    /// Open a fresh connection against the same logical name, closing the
    /// current one first if it is still open
    pub fn reopen(&mut self) -> Result<()> {
        self.close()?;

        let directory = self.location.directory();
        if !directory.exists() {
            std::fs::create_dir_all(&directory)?;
        }

        let path = self.location.backing_path();
        let store = NameStore::open(&path)?;
        self.state = HandleState::Open(store);
        self.generation += 1;
        tracing::info!(
            "Opened store handle {} (generation {})",
            path.display(),
            self.generation
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let location = StoreLocation::new(dir.path());

        let handle = StoreHandle::open(location.clone()).unwrap();
        assert!(handle.is_open());
        assert_eq!(handle.generation(), 1);
        assert!(location.directory().is_dir());
        assert!(location.backing_path().is_file());
    }

    #[test]
    fn test_closed_handle_rejects_operations() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = StoreHandle::open(StoreLocation::new(dir.path())).unwrap();

        handle.close().unwrap();
        handle.close().unwrap();
        assert!(!handle.is_open());
        assert!(matches!(handle.store_mut(), Err(Error::HandleClosed)));
    }

    #[test]
    fn test_reopen_sees_persisted_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = StoreHandle::open(StoreLocation::new(dir.path())).unwrap();
        let record = handle.store_mut().unwrap().insert("Ada").unwrap();

        handle.close().unwrap();
        handle.reopen().unwrap();

        assert_eq!(handle.generation(), 2);
        assert_eq!(handle.store_mut().unwrap().list_all().unwrap(), vec![record]);
    }
}
