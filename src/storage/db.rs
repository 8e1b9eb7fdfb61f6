//! Database connection management and migrations

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const SCHEMA_VERSION: i32 = 1;

/// Database error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::QueryFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::JsonParseError(err.to_string())
    }
}

/// Wrapper around SQLite connection
pub struct Database {
    pub conn: Connection,
    /// `None` for in-memory databases
    pub path: Option<PathBuf>,
}

/// Open or create the project database at `path`
pub fn open_database(path: &Path) -> Result<Database, DatabaseError> {
    info!("Opening database at {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    }

    let conn = Connection::open(path)
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    run_migrations(&conn)?;

    Ok(Database {
        conn,
        path: Some(path.to_path_buf()),
    })
}

/// Open a throwaway in-memory database with the current schema
pub fn open_in_memory() -> Result<Database, DatabaseError> {
    let conn = Connection::open_in_memory()
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    run_migrations(&conn)?;
    Ok(Database { conn, path: None })
}

fn current_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Run database schema migrations
fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let version = current_version(conn);
    info!("Current schema version: {}", version);

    if version < 1 {
        info!("Applying migration v1: Initial schema");
        conn.execute_batch(include_str!("schema.sql"))
            .map_err(|e| DatabaseError::MigrationFailed(format!("Failed to apply v1 schema: {}", e)))?;
    }

    debug_assert_eq!(current_version(conn), SCHEMA_VERSION);
    Ok(())
}
