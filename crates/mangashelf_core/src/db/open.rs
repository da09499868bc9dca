//! Connection bootstrap for file and in-memory collection databases.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Every open attempt emits one `db_open` start event and one outcome event.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const IN_MEMORY_TARGET: &str = ":memory:";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a collection database file.
///
/// # Side effects
/// - Creates the file when missing and applies pending migrations.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(&path.display().to_string(), || Connection::open(path))
}

/// Opens a throwaway in-memory collection database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(IN_MEMORY_TARGET, Connection::open_in_memory)
}

fn open_with(
    target: &str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start target={target}");

    let result = connect()
        .and_then(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            Ok(conn)
        })
        .map_err(|source| DbError::Open {
            target: target.to_string(),
            source,
        })
        .and_then(|mut conn| {
            apply_migrations(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok target={target} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error target={target} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}
