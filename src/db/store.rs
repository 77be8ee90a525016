//! Embedded backend: the record store kept in a local SQLite file.

use super::migrate::run_pending_migrations;
use super::pool::DbPool;
use super::queries;
use crate::errors::AppResult;
use crate::models::RecordId;
use crate::store::{EntityKind, Record, RecordStore};
use std::fs;
use std::path::Path;

pub struct SqliteStore {
    pool: DbPool,
    path: String,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and bring the schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let pool = DbPool::new(path)?;
        Self::from_pool(pool, path)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?, ":memory:")
    }

    fn from_pool(mut pool: DbPool, path: &str) -> AppResult<Self> {
        pool.with_conn(run_pending_migrations)?;
        Ok(Self {
            pool,
            path: path.to_string(),
        })
    }

    pub fn pool(&mut self) -> &mut DbPool {
        &mut self.pool
    }
}

impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "embedded"
    }

    fn target(&self) -> String {
        self.path.clone()
    }

    fn ping(&mut self) -> AppResult<String> {
        let version: String = self
            .pool
            .conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))?;
        Ok(format!("SQLite {version} at {}", self.path))
    }

    fn list(&mut self, kind: EntityKind, filter: Option<&RecordId>) -> AppResult<Vec<Record>> {
        let conn = &self.pool.conn;
        Ok(match kind {
            EntityKind::Trainee => queries::load_trainees(conn)?
                .into_iter()
                .map(Record::Trainee)
                .collect(),
            EntityKind::Program => queries::load_programs(conn, filter)?
                .into_iter()
                .map(Record::Program)
                .collect(),
            EntityKind::History => queries::load_history(conn, filter)?
                .into_iter()
                .map(Record::History)
                .collect(),
        })
    }

    fn create(&mut self, record: Record) -> AppResult<Record> {
        let conn = &self.pool.conn;
        Ok(match record {
            Record::Trainee(mut t) => {
                t.id = queries::insert_trainee(conn, &t)?;
                Record::Trainee(t)
            }
            Record::Program(mut p) => {
                p.id = queries::insert_program(conn, &p)?;
                Record::Program(p)
            }
            Record::History(mut h) => {
                h.id = queries::insert_history(conn, &h)?;
                Record::History(h)
            }
        })
    }

    fn update(&mut self, record: &Record) -> AppResult<()> {
        let conn = &self.pool.conn;
        match record {
            Record::Trainee(t) => queries::update_trainee(conn, t),
            Record::Program(p) => queries::update_program(conn, p),
            // History is append-only; re-writing an entry is a no-op.
            Record::History(_) => Ok(()),
        }
    }

    fn delete(&mut self, kind: EntityKind, id: &RecordId) -> AppResult<()> {
        match kind {
            EntityKind::Trainee => queries::delete_trainee_cascade(&mut self.pool.conn, id),
            EntityKind::Program => queries::delete_program(&self.pool.conn, id),
            EntityKind::History => queries::delete_history(&self.pool.conn, id),
        }
    }
}
