//! v001: entity_versions, applied_writes, applied_changes.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS entity_versions (
    key         TEXT PRIMARY KEY,
    version     INTEGER NOT NULL CHECK (version >= 0)
);

CREATE TABLE IF NOT EXISTS applied_writes (
    key         TEXT NOT NULL,
    version     INTEGER NOT NULL,
    PRIMARY KEY (key, version)
);

CREATE TABLE IF NOT EXISTS applied_changes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    endpoint    TEXT NOT NULL,
    timestamp   INTEGER NOT NULL,
    writes      TEXT NOT NULL,
    payload     TEXT NOT NULL,
    applied_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_applied_changes_endpoint ON applied_changes(endpoint);
";
