//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 3;

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        apply(conn, 1, MIGRATION_V1)?;
    }
    if version < 2 {
        apply(conn, 2, MIGRATION_V2)?;
    }
    if version < 3 {
        apply(conn, 3, MIGRATION_V3)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| Ok(row.get::<_, i32>(0)? != 0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Version 1: potential match table with sync bookkeeping columns
const MIGRATION_V1: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS potential_matches (
        id TEXT PRIMARY KEY,
        enquiry_id TEXT NOT NULL DEFAULT '',
        child_id TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        revision TEXT NOT NULL DEFAULT '',
        confirmed TEXT NOT NULL DEFAULT 'false',
        created_by TEXT NOT NULL,
        synced INTEGER NOT NULL DEFAULT 0,
        updated_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_potential_matches_enquiry ON potential_matches(enquiry_id)",
    "CREATE INDEX IF NOT EXISTS idx_potential_matches_child ON potential_matches(child_id)",
    "CREATE INDEX IF NOT EXISTS idx_potential_matches_owner ON potential_matches(created_by)",
    "CREATE INDEX IF NOT EXISTS idx_potential_matches_synced ON potential_matches(synced)",
];

/// Version 2: local change history
const MIGRATION_V2: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS potential_match_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        match_id TEXT NOT NULL,
        action TEXT NOT NULL,
        revision TEXT NOT NULL,
        changed_by TEXT NOT NULL,
        changed_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_potential_match_history_match ON potential_match_history(match_id)",
];

/// Version 3: local deletes not yet acknowledged by the remote side
const MIGRATION_V3: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS potential_match_tombstones (
        id TEXT PRIMARY KEY,
        revision TEXT NOT NULL,
        deleted_by TEXT NOT NULL,
        deleted_at INTEGER NOT NULL
    )",
];

/// Apply one migration atomically; the transaction rolls back on drop if any statement fails
fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    for stmt in statements {
        tx.execute(stmt, [])?;
    }
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;

    tx.commit()?;

    tracing::info!("Migrated database to version {version} of {CURRENT_VERSION}");
    Ok(())
}
