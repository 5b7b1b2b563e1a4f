//! # Namebook - a single editable list of names
//!
//! Namebook keeps one table of names in an embedded SQLite file and lets the
//! whole file be exchanged as an opaque snapshot.
//!
//! Namebook provides:
//! - A record store with transactional create/read/update/delete over `names(id, name)`
//! - An explicit store handle lifecycle (`open → [close → reopen]* → teardown`)
//! - Snapshot export to a share target and atomic snapshot import from a picked file
//! - A single-writer service that serializes operations from concurrent callers
//! - A CLI and a small HTTP API as presentation layers

pub mod record;
pub mod storage;
pub mod exchange;
pub mod coordinator;
pub mod service;
pub mod server;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::NameRecord;
pub use storage::{NameStore, StoreHandle, StoreLocation};
pub use exchange::{ExchangeReason, ImportOutcome, SnapshotExchanger};
pub use coordinator::Coordinator;
pub use service::{ServiceWorker, StoreService};

/// Result type alias for Namebook operations
pub type Result<T> = std::result::Result<T, Error>;

/// The CRUD statement a [`Error::Store`] failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Insert,
    Update,
    Delete,
    Close,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::List => "list",
            StoreOperation::Insert => "insert",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
            StoreOperation::Close => "close",
        }
    }
}

impl std::fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error types for Namebook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Store error during {operation}: {cause}")]
    Store {
        operation: StoreOperation,
        #[source]
        cause: rusqlite::Error,
    },

    #[error("Exchange error ({reason}): {source}")]
    Exchange {
        reason: ExchangeReason,
        #[source]
        source: std::io::Error,
    },

    #[error("Store handle is closed")]
    HandleClosed,

    #[error("Store worker is not running")]
    WorkerStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn store(operation: StoreOperation, cause: rusqlite::Error) -> Self {
        Error::Store { operation, cause }
    }

    pub(crate) fn exchange(reason: ExchangeReason, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Exchange {
            reason,
            source: std::io::Error::other(source),
        }
    }

    pub(crate) fn exchange_io(reason: ExchangeReason, source: std::io::Error) -> Self {
        Error::Exchange { reason, source }
    }

    /// The exchange reason, if this is an exchange failure
    pub fn exchange_reason(&self) -> Option<ExchangeReason> {
        match self {
            Error::Exchange { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
