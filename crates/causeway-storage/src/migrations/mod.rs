//! Schema migrations using PRAGMA user_version.

pub mod v001_initial;

use rusqlite::Connection;

use causeway_core::errors::StoreError;

use crate::to_store_err;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version = current_version(conn).map_err(|e| StoreError::MigrationFailed {
        version: 0,
        message: e.to_string(),
    })?;

    let migrations: &[(&str, u32)] = &[(v001_initial::MIGRATION_SQL, 1)];

    for (sql, version) in migrations {
        if current_version < *version {
            conn.execute_batch(sql)
                .and_then(|()| conn.pragma_update(None, "user_version", version))
                .map_err(|e| StoreError::MigrationFailed {
                    version: *version,
                    message: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StoreError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(to_store_err)
}
