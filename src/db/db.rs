use crate::db::migrations::init_with_migrations;
use crate::libs::config::{Config, DatabaseConfig};
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_FILE_NAME: &str = "choreboard.db";

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "CHOREBOARD_DB";

/// An open, migrated SQLite connection.
///
/// Repositories borrow `conn` (or a transaction over it), so one `Db` can back
/// several repositories and a multi-table write can share one transaction.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the default database: `CHOREBOARD_DB`, then the configured path,
    /// then the platform data directory.
    pub fn new() -> Result<Db> {
        let config = Config::read()?.database.unwrap_or_default();
        let path = Self::resolve_path(&config)?;
        Self::open_with(path, &config)
    }

    /// Opens the database at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        Self::open_with(path, &DatabaseConfig::default())
    }

    pub fn open_with(path: impl AsRef<Path>, config: &DatabaseConfig) -> Result<Db> {
        let mut conn = Connection::open(path)?;
        Self::configure(&conn, config)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&conn, &DatabaseConfig::default())?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Opens a connection without applying migrations.
    pub fn new_without_migrations(path: impl AsRef<Path>) -> Result<Connection> {
        let conn = Connection::open(path)?;
        Self::configure(&conn, &DatabaseConfig::default())?;
        Ok(conn)
    }

    pub fn resolve_path(config: &DatabaseConfig) -> Result<PathBuf> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if let Some(path) = &config.path {
            return Ok(PathBuf::from(path));
        }
        DataStorage::new().get_path(DB_FILE_NAME)
    }

    fn configure(conn: &Connection, config: &DatabaseConfig) -> Result<()> {
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(())
    }
}
