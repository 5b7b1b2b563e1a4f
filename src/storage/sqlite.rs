//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, Transaction, params};
use crate::{Error, Result, StoreOperation};
use crate::record::NameRecord;
use super::schema;

/// SQLite-backed record store for the `names` table.
///
/// Every public operation runs inside its own transaction holding exactly one
/// statement. Nothing spans operations: an insert followed by an update is two
/// independent commits.
pub struct NameStore {
    conn: Connection,
}

impl NameStore {
    /// Open a database file (creates if doesn't exist) and ensure the schema
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(Error::Schema)?;
        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Schema)?;
        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the `names` table if it is absent. Safe to call repeatedly.
    pub fn ensure_schema(&mut self) -> Result<()> {
        let tx = self.conn.transaction().map_err(Error::Schema)?;
        tx.execute(schema::CREATE_NAMES_TABLE, [])
            .map_err(Error::Schema)?;
        tx.commit().map_err(Error::Schema)
    }

    /// All records in storage-native order, materialized at call time
    pub fn list_all(&mut self) -> Result<Vec<NameRecord>> {
        self.in_transaction(StoreOperation::List, |tx| {
            let mut stmt = tx.prepare(schema::SELECT_ALL_NAMES)?;
            let records = stmt
                .query_map([], NameRecord::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    /// Insert a name and return the record with its assigned id
    pub fn insert(&mut self, name: &str) -> Result<NameRecord> {
        let record = self.in_transaction(StoreOperation::Insert, |tx| {
            tx.execute(schema::INSERT_NAME, params![name])?;
            Ok(NameRecord::new(tx.last_insert_rowid(), name))
        })?;
        tracing::debug!("Inserted name {}", record.id);
        Ok(record)
    }

    /// Rename the record with `id`. Returns false when no such record exists.
    pub fn update(&mut self, id: i64, name: &str) -> Result<bool> {
        let affected = self.in_transaction(StoreOperation::Update, |tx| {
            tx.execute(schema::UPDATE_NAME, params![name, id])
        })?;
        tracing::debug!("Updated name {} ({} rows affected)", id, affected);
        Ok(affected > 0)
    }

    /// Delete the record with `id`. Returns false when no such record exists.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let affected = self.in_transaction(StoreOperation::Delete, |tx| {
            tx.execute(schema::DELETE_NAME, params![id])
        })?;
        tracing::debug!("Deleted name {} ({} rows affected)", id, affected);
        Ok(affected > 0)
    }

    /// Count all records
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(schema::COUNT_NAMES, [], |row| row.get(0))
            .map_err(|e| Error::store(StoreOperation::List, e))?;
        Ok(count as usize)
    }

    /// Close the connection, releasing the file and any locks it holds
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_conn, e)| Error::store(StoreOperation::Close, e))
    }

    /// Run `f` in a transaction of its own, committing on success
    fn in_transaction<T>(
        &mut self,
        operation: StoreOperation,
        f: impl FnOnce(&Transaction) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let run = |conn: &mut Connection| -> rusqlite::Result<T> {
            let tx = conn.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        };
        run(&mut self.conn).map_err(|e| {
            tracing::warn!("{} failed: {}", operation, e);
            Error::store(operation, e)
        })
    }
}

/// Whether `bytes` start with the SQLite file header. An empty file opens
/// as a valid empty database, so opening alone does not prove a snapshot.
pub(crate) fn has_database_header(bytes: &[u8]) -> bool {
    bytes.starts_with(schema::SQLITE_HEADER)
}

/// Check that `path` is a readable SQLite database without touching it
pub(crate) fn probe_database(path: &Path) -> rusqlite::Result<()> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let _tables: i64 = conn.query_row(schema::PROBE_DATABASE, [], |row| row.get(0))?;
    conn.close().map_err(|(_conn, e)| e)
}
