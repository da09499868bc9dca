//! Collection database: one SQLite file holding the `kv_entries` table.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A connection handed out by `open_db*` already has the latest schema, so
//!   the key-value repository never sees a half-migrated file.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The file (or in-memory database) could not be opened or configured.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// A migration script failed; nothing from the batch was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Statement failure after the connection was ready.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open collection database `{target}`: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "collection schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "collection database uses schema {found}; this build reads up to {supported}"
            ),
            Self::Sqlite(err) => write!(f, "collection storage query failed: {err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
