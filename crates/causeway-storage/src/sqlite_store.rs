//! SQLite-backed local store.
//!
//! One connection behind a mutex. Each apply runs in its own `IMMEDIATE`
//! transaction so the version check and the update cannot interleave with
//! another writer.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use causeway_core::errors::StoreError;
use causeway_core::models::Change;
use causeway_core::traits::LocalStore;
use causeway_core::{ApplyOutcome, Dependency};

use crate::journal::JournalEntry;
use crate::{migrations, pool, to_store_err};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (and migrate) a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(pool::open(path)?)
    }

    /// Open a private in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(pool::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Seed an entity at a version, as if earlier changes had been applied.
    pub fn set_version(&self, key: &str, version: u64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        upsert_version(&conn, key, version)
    }

    /// Number of changes committed so far.
    pub fn applied_count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM applied_changes", [], |row| row.get(0))
            .map_err(to_store_err)?;
        Ok(count as usize)
    }

    /// Journal entries for one endpoint, in commit order.
    pub fn changes_for(&self, endpoint: &str) -> Result<Vec<JournalEntry>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT endpoint, timestamp, writes, payload FROM applied_changes
                 WHERE endpoint = ?1 ORDER BY id",
            )
            .map_err(to_store_err)?;
        let rows = stmt
            .query_map(params![endpoint], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(to_store_err)?;

        let mut entries = Vec::new();
        for row in rows {
            let (endpoint, timestamp, writes, payload) = row.map_err(to_store_err)?;
            entries.push(JournalEntry {
                endpoint,
                timestamp,
                writes: serde_json::from_str(&writes).map_err(to_store_err)?,
                payload: serde_json::from_str(&payload).map_err(to_store_err)?,
            });
        }
        Ok(entries)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::backend("sqlite connection lock poisoned"))
    }

    fn try_apply(&self, change: &Change<'_>) -> Result<ApplyOutcome, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(to_store_err)?;

        if let Some(first) = change.writes.first() {
            let mut all_applied = true;
            for write in change.writes {
                if !is_applied(&tx, write)? {
                    all_applied = false;
                    break;
                }
            }
            if all_applied {
                return Ok(ApplyOutcome::AlreadyApplied {
                    write: first.clone(),
                });
            }

            for write in change.writes {
                let expected = write.precondition().version();
                let found = read_version(&tx, write.key())?;
                if found != expected {
                    return Ok(ApplyOutcome::Failed(StoreError::Conflict {
                        key: write.key().to_string(),
                        expected,
                        found,
                    }));
                }
            }

            for write in change.writes {
                upsert_version(&tx, write.key(), write.version())?;
                tx.execute(
                    "INSERT INTO applied_writes (key, version) VALUES (?1, ?2)",
                    params![write.key(), to_sql_version(write.version())?],
                )
                .map_err(to_store_err)?;
            }
        }

        let writes = serde_json::to_string(change.writes).map_err(to_store_err)?;
        let payload = serde_json::to_string(change.payload).map_err(to_store_err)?;
        tx.execute(
            "INSERT INTO applied_changes (endpoint, timestamp, writes, payload, applied_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                change.endpoint,
                change.timestamp,
                writes,
                payload,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(to_store_err)?;

        tx.commit().map_err(to_store_err)?;
        Ok(ApplyOutcome::Applied)
    }
}

impl LocalStore for SqliteStore {
    fn version_of(&self, key: &str) -> Result<u64, StoreError> {
        let conn = self.lock()?;
        read_version(&conn, key)
    }

    fn apply(&self, change: &Change<'_>) -> ApplyOutcome {
        // Dropping an uncommitted transaction rolls it back.
        self.try_apply(change).unwrap_or_else(ApplyOutcome::Failed)
    }

    fn with_unit_of_work<T, F>(&self, endpoint: &str, work: F) -> T
    where
        F: FnOnce(&Self) -> T,
    {
        let started = Instant::now();
        let result = work(self);
        tracing::debug!(
            endpoint = %endpoint,
            elapsed_us = started.elapsed().as_micros() as u64,
            "sqlite unit of work finished"
        );
        result
    }
}

fn read_version(conn: &Connection, key: &str) -> Result<u64, StoreError> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT version FROM entity_versions WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(to_store_err)?;
    Ok(version.map_or(0, |v| v.max(0) as u64))
}

fn is_applied(tx: &Transaction<'_>, write: &Dependency) -> Result<bool, StoreError> {
    tx.query_row(
        "SELECT 1 FROM applied_writes WHERE key = ?1 AND version = ?2",
        params![write.key(), to_sql_version(write.version())?],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
    .map_err(to_store_err)
}

fn upsert_version(conn: &Connection, key: &str, version: u64) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO entity_versions (key, version) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET version = excluded.version",
        params![key, to_sql_version(version)?],
    )
    .map_err(to_store_err)?;
    Ok(())
}

fn to_sql_version(version: u64) -> Result<i64, StoreError> {
    i64::try_from(version).map_err(|_| StoreError::backend(format!("version {version} exceeds i64")))
}
