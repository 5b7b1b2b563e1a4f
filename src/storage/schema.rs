//! Database schema and statement definitions
//!
//! Column set and AUTOINCREMENT semantics must stay as they are so that
//! snapshots written by earlier versions remain importable.

/// SQL to create the names table
pub const CREATE_NAMES_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS names (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)";

pub const SELECT_ALL_NAMES: &str = "SELECT * FROM names";

pub const INSERT_NAME: &str = "INSERT INTO names (name) VALUES (?1)";

pub const UPDATE_NAME: &str = "UPDATE names SET name = ?1 WHERE id = ?2";

pub const DELETE_NAME: &str = "DELETE FROM names WHERE id = ?1";

pub const COUNT_NAMES: &str = "SELECT COUNT(*) FROM names";

/// Used to check that a candidate snapshot is a readable SQLite database
pub const PROBE_DATABASE: &str = "SELECT COUNT(*) FROM sqlite_master";

/// First 16 bytes of every SQLite database file
pub const SQLITE_HEADER: &[u8] = b"SQLite format 3\0";
