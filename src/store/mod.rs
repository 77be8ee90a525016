//! Record store adapter: uniform CRUD over trainees, programs and history,
//! backed either by the REST API or by the embedded SQLite file.

pub mod rest;

use crate::config::BackendConfig;
use crate::db::store::SqliteStore;
use crate::errors::{AppError, AppResult};
use crate::models::program::sort_by_order;
use crate::models::{HistoryEntry, Program, RecordId, Trainee};
use rest::RestStore;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Trainee,
    Program,
    History,
}

impl EntityKind {
    /// Collection name, shared by the REST paths and the SQLite tables.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Trainee => "trainees",
            EntityKind::Program => "programs",
            EntityKind::History => "history",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}

/// One stored entity of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Trainee(Trainee),
    Program(Program),
    History(HistoryEntry),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Trainee(_) => EntityKind::Trainee,
            Record::Program(_) => EntityKind::Program,
            Record::History(_) => EntityKind::History,
        }
    }

    pub fn id(&self) -> &RecordId {
        match self {
            Record::Trainee(t) => &t.id,
            Record::Program(p) => &p.id,
            Record::History(h) => &h.id,
        }
    }

    pub fn into_trainee(self) -> AppResult<Trainee> {
        match self {
            Record::Trainee(t) => Ok(t),
            other => Err(unexpected(EntityKind::Trainee, &other)),
        }
    }

    pub fn into_program(self) -> AppResult<Program> {
        match self {
            Record::Program(p) => Ok(p),
            other => Err(unexpected(EntityKind::Program, &other)),
        }
    }

    pub fn into_history(self) -> AppResult<HistoryEntry> {
        match self {
            Record::History(h) => Ok(h),
            other => Err(unexpected(EntityKind::History, &other)),
        }
    }
}

fn unexpected(wanted: EntityKind, got: &Record) -> AppError {
    AppError::Store(format!("expected a {wanted} record, got {}", got.kind()))
}

/// CRUD surface every persistence backend provides.
pub trait RecordStore {
    /// `"rest"` or `"embedded"`.
    fn backend_name(&self) -> &'static str;

    /// Where the data lives (API base URL or database path).
    fn target(&self) -> String;

    /// Liveness probe.
    fn ping(&mut self) -> AppResult<String>;

    /// All records of `kind`; `filter` restricts programs and history to one trainee.
    fn list(&mut self, kind: EntityKind, filter: Option<&RecordId>) -> AppResult<Vec<Record>>;

    /// Persist a new record and return it with its canonical id.
    fn create(&mut self, record: Record) -> AppResult<Record>;

    fn update(&mut self, record: &Record) -> AppResult<()>;

    /// Deleting a trainee also deletes its programs and history.
    fn delete(&mut self, kind: EntityKind, id: &RecordId) -> AppResult<()>;
}

/// Typed helpers on top of [`RecordStore`].
pub trait RecordStoreExt: RecordStore {
    fn trainees(&mut self) -> AppResult<Vec<Trainee>> {
        self.list(EntityKind::Trainee, None)?
            .into_iter()
            .map(Record::into_trainee)
            .collect()
    }

    /// A trainee's programs in display order.
    fn programs_of(&mut self, trainee: &RecordId) -> AppResult<Vec<Program>> {
        let mut programs = self
            .list(EntityKind::Program, Some(trainee))?
            .into_iter()
            .map(Record::into_program)
            .collect::<AppResult<Vec<_>>>()?;
        sort_by_order(&mut programs);
        Ok(programs)
    }

    fn history(&mut self, trainee: Option<&RecordId>) -> AppResult<Vec<HistoryEntry>> {
        self.list(EntityKind::History, trainee)?
            .into_iter()
            .map(Record::into_history)
            .collect()
    }

    fn create_trainee(&mut self, trainee: Trainee) -> AppResult<Trainee> {
        self.create(Record::Trainee(trainee))?.into_trainee()
    }

    fn create_program(&mut self, program: Program) -> AppResult<Program> {
        self.create(Record::Program(program))?.into_program()
    }

    fn append_history(&mut self, entry: HistoryEntry) -> AppResult<HistoryEntry> {
        self.create(Record::History(entry))?.into_history()
    }
}

impl<T: RecordStore + ?Sized> RecordStoreExt for T {}

/// Open the backend selected by configuration.
pub fn open(backend: &BackendConfig) -> AppResult<Box<dyn RecordStore>> {
    tracing::debug!(?backend, "opening record store");
    match backend {
        BackendConfig::Rest { api_base } => Ok(Box::new(RestStore::new(api_base)?)),
        BackendConfig::Embedded { database } => Ok(Box::new(SqliteStore::open(database)?)),
    }
}
