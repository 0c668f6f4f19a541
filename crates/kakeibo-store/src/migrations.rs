//! Database schema migrations.
//!
//! Applies the initial schema: the expenses table and the
//! schema_migrations tracking table.

use rusqlite::Connection;
use tracing::info;

use kakeibo_core::error::KakeiboError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental changes.
pub fn run_migrations(conn: &Connection) -> Result<(), KakeiboError> {
    // Create the migrations tracking table first.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| KakeiboError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| KakeiboError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<(), KakeiboError> {
    conn.execute_batch(
        "
        -- Committed expense records. Insert-only: the core never updates
        -- or deletes a row.
        CREATE TABLE IF NOT EXISTS expenses (
            id          TEXT PRIMARY KEY NOT NULL,
            owner       INTEGER NOT NULL,
            amount      REAL NOT NULL CHECK (amount > 0),
            category    TEXT NOT NULL CHECK (length(category) > 0),
            occurred_at INTEGER NOT NULL,
            created_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        -- Aggregate queries filter by owner and a trailing time window.
        CREATE INDEX IF NOT EXISTS idx_expenses_owner_occurred
            ON expenses (owner, occurred_at DESC);

        -- Record migration.
        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| KakeiboError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
