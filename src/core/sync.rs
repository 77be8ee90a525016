//! Everything that moves state between the session and the backend:
//! startup, first-run seeding, the history journal and the flush of
//! pending changes.

use super::legacy::migrate_legacy_state;
use super::session::Session;
use crate::config::Preferences;
use crate::errors::{AppError, AppResult};
use crate::models::program::DEFAULT_PROGRAM_TITLE;
use crate::models::{Grid, Program, Trainee};
use crate::store::{EntityKind, Record, RecordStore, RecordStoreExt};
use std::path::Path;

/// Names given to the trainees seeded into an empty store.
pub const DEFAULT_TRAINEES: [&str; 2] = ["עידו", "יאיר"];

/// Counts of what a flush wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FlushReport {
    pub trainees_created: usize,
    pub trainees_updated: usize,
    pub trainees_deleted: usize,
    pub programs_created: usize,
    pub programs_updated: usize,
    pub programs_deleted: usize,
    pub history_written: usize,
}

impl FlushReport {
    pub fn total(&self) -> usize {
        self.trainees_created
            + self.trainees_updated
            + self.trainees_deleted
            + self.programs_created
            + self.programs_updated
            + self.programs_deleted
    }
}

/// Create the default roster: two trainees with one blank program each.
pub fn seed_defaults(store: &mut dyn RecordStore) -> AppResult<()> {
    for name in DEFAULT_TRAINEES {
        let trainee = store.create_trainee(Trainee::draft(name))?;
        store.create_program(Program::draft(
            trainee.id.clone(),
            DEFAULT_PROGRAM_TITLE,
            Grid::default(),
            0,
        ))?;
        tracing::info!(trainee = %trainee.id, name, "seeded default trainee");
    }
    Ok(())
}

/// Start a session against `store`.
///
/// A `buffered` session (unsaved work from an earlier invocation) is resumed
/// as is; otherwise the roster is loaded, migrated from legacy local state or
/// seeded, and the preferred trainee's programs are fetched. Any failure here
/// is reported as [`AppError::Startup`].
pub fn bootstrap(
    store: &mut dyn RecordStore,
    prefs: &Preferences,
    legacy_file: Option<&Path>,
    buffered: Option<Session>,
) -> AppResult<Session> {
    let backend = store.backend_name();
    let target = store.target();

    start(store, prefs, legacy_file, buffered).map_err(|e| {
        tracing::error!(backend, %target, error = %e, "startup failed");
        AppError::Startup {
            backend: backend.to_string(),
            target,
            reason: e.to_string(),
        }
    })
}

fn start(
    store: &mut dyn RecordStore,
    prefs: &Preferences,
    legacy_file: Option<&Path>,
    buffered: Option<Session>,
) -> AppResult<Session> {
    tracing::info!(backend = store.backend_name(), target = %store.target(), "pinging backend");
    let pong = store.ping()?;
    tracing::debug!(%pong, "backend is alive");

    if let Some(session) = buffered {
        tracing::info!("resuming session with unsaved changes");
        return Ok(session);
    }

    if store.backend_name() == "embedded"
        && let Some(path) = legacy_file
        && let Some(report) = migrate_legacy_state(store, path)?
    {
        tracing::info!(?report, "legacy local state migrated");
    }

    let mut trainees = store.trainees()?;
    tracing::info!(count = trainees.len(), "loaded trainees");
    if trainees.is_empty() {
        tracing::info!("store is empty, adding default trainees");
        seed_defaults(store)?;
        trainees = store.trainees()?;
    }

    let mut session = Session::new(trainees, prefs.current_trainee_index, Vec::new());
    if let Some(trainee) = session.current_trainee() {
        let id = trainee.id.clone();
        session.programs = store.programs_of(&id)?;
    }
    Ok(session)
}

/// Programs of `session.trainees[index]`; a trainee that only exists locally has none stored.
pub fn programs_for(
    store: &mut dyn RecordStore,
    session: &Session,
    index: usize,
) -> AppResult<Vec<Program>> {
    match session.trainees.get(index) {
        Some(t) if t.id.is_durable() => store.programs_of(&t.id),
        Some(_) => Ok(Vec::new()),
        None => Err(AppError::InvalidTrainee(index + 1)),
    }
}

/// Fresh session from the backend, dropping every pending change.
/// The current position is kept when the roster still has it.
pub fn reload(store: &mut dyn RecordStore, session: &Session) -> AppResult<Session> {
    let trainees = store.trainees()?;
    let mut fresh = Session::new(trainees, session.current, Vec::new());
    if fresh.current_trainee().is_some() {
        fresh.programs = programs_for(store, &fresh, fresh.current)?;
    }
    // Entries of saved trainees are still owed to the backend.
    fresh.journal = session
        .journal
        .iter()
        .filter(|h| h.trainee_id.is_durable())
        .cloned()
        .collect();
    tracing::info!(trainees = fresh.trainees.len(), "session reloaded");
    Ok(fresh)
}

/// Write queued history entries in order. Entries whose trainee has not been
/// saved yet stay queued. On failure the unwritten entries stay queued too.
pub fn drain_journal(store: &mut dyn RecordStore, session: &mut Session) -> AppResult<usize> {
    let mut written = 0;
    let mut kept = Vec::new();
    let mut pending = std::mem::take(&mut session.journal).into_iter();

    while let Some(entry) = pending.next() {
        if entry.trainee_id.is_temporary() {
            kept.push(entry);
            continue;
        }
        if let Err(e) = store.append_history(entry.clone()) {
            kept.push(entry);
            kept.extend(pending);
            session.journal = kept;
            return Err(e);
        }
        written += 1;
    }

    session.journal = kept;
    Ok(written)
}

/// Push every pending change to the backend.
///
/// Order: program deletions, trainee deletions, trainee writes (new trainees
/// get their canonical id, which is propagated to their programs and queued
/// history), program writes, then the journal. Each record leaves its pending
/// set as soon as its write succeeds, so an error leaves exactly the
/// unwritten work pending.
pub fn flush(store: &mut dyn RecordStore, session: &mut Session) -> AppResult<FlushReport> {
    let mut report = FlushReport::default();

    let doomed: Vec<_> = session.program_changes.deleted().cloned().collect();
    for id in doomed {
        tracing::debug!(%id, "deleting program");
        store.delete(EntityKind::Program, &id)?;
        session.program_changes.clear_deleted(&id);
        report.programs_deleted += 1;
    }

    let doomed: Vec<_> = session.trainee_changes.deleted().cloned().collect();
    for id in doomed {
        tracing::debug!(%id, "deleting trainee");
        store.delete(EntityKind::Trainee, &id)?;
        session.journal.retain(|h| h.trainee_id != id);
        session.trainee_changes.clear_deleted(&id);
        report.trainees_deleted += 1;
    }

    let dirty: Vec<_> = session.trainee_changes.dirty().cloned().collect();
    for id in dirty {
        let Some(trainee) = session.trainees.iter().find(|t| t.id == id).cloned() else {
            session.trainee_changes.clear_dirty(&id);
            continue;
        };

        if id.is_temporary() {
            let saved = store.create_trainee(trainee)?;
            tracing::debug!(temp = %id, id = %saved.id, "trainee created");
            session.remap_trainee(&id, &saved.id);
            session.trainee_changes.clear_dirty(&saved.id);
            report.trainees_created += 1;
        } else {
            store.update(&Record::Trainee(trainee))?;
            session.trainee_changes.clear_dirty(&id);
            report.trainees_updated += 1;
        }
    }

    let dirty: Vec<_> = session.program_changes.dirty().cloned().collect();
    for id in dirty {
        let Some(program) = session.programs.iter().find(|p| p.id == id).cloned() else {
            session.program_changes.clear_dirty(&id);
            continue;
        };
        if program.trainee_id.is_temporary() {
            // Its trainee was removed before ever being saved.
            session.program_changes.clear_dirty(&id);
            continue;
        }

        if id.is_temporary() {
            let saved = store.create_program(program)?;
            tracing::debug!(temp = %id, id = %saved.id, "program created");
            session.remap_program(&id, &saved.id);
            session.program_changes.clear_dirty(&saved.id);
            report.programs_created += 1;
        } else {
            store.update(&Record::Program(program))?;
            session.program_changes.clear_dirty(&id);
            report.programs_updated += 1;
        }
    }

    report.history_written = drain_journal(store, session)?;
    tracing::info!(?report, "flush complete");
    Ok(report)
}
