//! The single SQLite connection behind the embedded store.

use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

/// Wait this long on a locked file before giving up, e.g. while another
/// `myfit` process is saving.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    pub conn: Connection,
}

fn configure(conn: Connection) -> Result<DbPool> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(DbPool { conn })
}

impl DbPool {
    /// Open `path`; the parent directory must already exist.
    pub fn new(path: &str) -> Result<Self> {
        configure(Connection::open(Path::new(path))?)
    }

    /// Private database that disappears with the connection.
    pub fn in_memory() -> Result<Self> {
        configure(Connection::open_in_memory()?)
    }

    pub fn with_conn<F, T>(&mut self, func: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        func(&mut self.conn)
    }
}
