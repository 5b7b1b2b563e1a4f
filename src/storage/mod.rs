//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with one table:
//! - names(id, name)
//!
//! The file lives at a fixed location (see [`StoreLocation`]) and is reached
//! through exactly one [`StoreHandle`] per process.

pub mod schema;
pub mod location;
pub mod sqlite;
pub mod handle;

pub use location::StoreLocation;
pub use sqlite::NameStore;
pub use handle::{HandleState, StoreHandle};
