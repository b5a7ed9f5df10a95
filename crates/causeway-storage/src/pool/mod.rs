//! Connection setup for the SQLite store.

pub mod pragmas;

use std::path::Path;

use rusqlite::Connection;

use causeway_core::errors::StoreError;

use crate::to_store_err;

/// Open a file-backed connection in WAL mode.
///
/// Fails if the file cannot be switched to WAL (e.g. a read-only or
/// network filesystem).
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path).map_err(to_store_err)?;
    pragmas::apply_pragmas(&conn)?;
    if !pragmas::verify_wal_mode(&conn)? {
        return Err(StoreError::backend(format!(
            "{} did not switch to WAL journal mode",
            path.display()
        )));
    }
    tracing::debug!(path = %path.display(), "sqlite store opened in WAL mode");
    Ok(conn)
}

/// Open an in-memory connection (for testing).
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory().map_err(to_store_err)?;
    pragmas::apply_pragmas(&conn)?;
    Ok(conn)
}
