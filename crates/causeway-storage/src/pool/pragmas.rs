//! PRAGMA configuration for store connections.
//!
//! Applies commit in WAL mode with NORMAL sync; a busy connection waits up
//! to 5s for the `IMMEDIATE` write lock before failing the apply.

use rusqlite::Connection;

use causeway_core::errors::StoreError;

use crate::to_store_err;

const STORE_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA busy_timeout = 5000;
    PRAGMA foreign_keys = ON;
";

pub fn apply_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(STORE_PRAGMAS).map_err(to_store_err)
}

/// True when the connection's journal mode is WAL.
///
/// In-memory databases report `memory` and never switch.
pub fn verify_wal_mode(conn: &Connection) -> Result<bool, StoreError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(to_store_err)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
