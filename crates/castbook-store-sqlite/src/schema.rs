//! SQL schema for the Castbook SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The CHECK constraints back up the typed layer: a row can never carry an
/// empty name or a nationality outside the recognised code set, no matter
/// which path wrote it.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS actors (
    actor_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL CHECK (length(trim(name)) > 0),
    birthday    TEXT,    -- ISO 8601 calendar date (YYYY-MM-DD) or NULL
    nationality TEXT CHECK (nationality IN ('USA', 'BRAZIL'))
);

CREATE INDEX IF NOT EXISTS actors_name_idx ON actors(name);

PRAGMA user_version = 1;
";
