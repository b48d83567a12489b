//! SQL schema for the Bazaar SQLite store.
//!
//! Executed once at connection startup. The table layout is shared with the
//! image service and older deployments, so column names and types must not
//! change. Future migrations will be gated on `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Several handles may share one file; writers wait for the lock.
PRAGMA busy_timeout = 5000;

-- Keyword search is case-sensitive.
PRAGMA case_sensitive_like = ON;

-- Created lazily on first use of a name; never updated or deleted.
CREATE TABLE IF NOT EXISTS categories_table (
    id   INTEGER PRIMARY KEY,
    name TEXT UNIQUE
);

-- One row per distinct item name; immutable once written.
CREATE TABLE IF NOT EXISTS items_table (
    id          INTEGER PRIMARY KEY,
    name        TEXT,
    category_id INTEGER REFERENCES categories_table(id),
    image_name  TEXT
);

CREATE INDEX IF NOT EXISTS items_name_idx ON items_table(name);

PRAGMA user_version = 1;
";
