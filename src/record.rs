//! Name record - the single row type of the store

use serde::{Deserialize, Serialize};

/// A row of the `names` table.
///
/// `id` is the surrogate key assigned by SQLite on insert. `name` carries no
/// NOT NULL constraint, so snapshots produced elsewhere may hold NULL names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameRecord {
    pub id: i64,
    pub name: Option<String>,
}

impl NameRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }

    /// Name for display; NULL renders as an empty string
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

impl std::fmt::Display for NameRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.display_name())
    }
}
