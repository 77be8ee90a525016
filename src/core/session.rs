//! Application state and the transitions the commands apply to it.
//!
//! Every method here is a pure in-memory transition: it edits the state,
//! marks what changed in the trackers and queues the matching history
//! entry in the journal. Talking to the backend is left to `core::sync`.

use super::grid::{Direction, move_block};
use super::tracker::DirtySet;
use crate::errors::{AppError, AppResult};
use crate::models::grid::NEW_COLUMN_LABEL;
use crate::models::program::{next_order_index, sort_by_order};
use crate::models::{Action, Grid, HistoryEntry, Program, RecordId, Trainee};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Trainee,
    History,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Roster, in backend order plus any unsaved additions.
    pub trainees: Vec<Trainee>,
    /// Blocks of the current trainee, in display order.
    pub programs: Vec<Program>,
    pub current: usize,
    /// Every invocation starts on the trainee tab.
    #[serde(skip)]
    pub active_tab: Tab,
    pub trainee_changes: DirtySet,
    pub program_changes: DirtySet,
    /// History entries not written to the backend yet.
    pub journal: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(trainees: Vec<Trainee>, current: usize, mut programs: Vec<Program>) -> Self {
        let current = if current < trainees.len() { current } else { 0 };
        sort_by_order(&mut programs);
        Self {
            trainees,
            programs,
            current,
            ..Self::default()
        }
    }

    pub fn current_trainee(&self) -> Option<&Trainee> {
        self.trainees.get(self.current)
    }

    pub fn block(&self, index: usize) -> AppResult<&Program> {
        self.programs
            .get(index)
            .ok_or(AppError::InvalidBlock(index + 1))
    }

    fn block_mut(&mut self, index: usize) -> AppResult<&mut Program> {
        self.programs
            .get_mut(index)
            .ok_or(AppError::InvalidBlock(index + 1))
    }

    /// Unsaved roster or program changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.trainee_changes.is_pending() || self.program_changes.is_pending()
    }

    /// Unsaved changes that belong to the programs currently on screen.
    pub fn has_unsaved_view_changes(&self) -> bool {
        self.program_changes.is_pending()
    }

    /// Anything that must outlive this invocation.
    pub fn needs_buffer(&self) -> bool {
        self.has_unsaved_changes() || !self.journal.is_empty()
    }

    /// Queue a history entry against the current trainee.
    fn log(&mut self, action: Action, description: impl Into<String>) {
        let Some(trainee) = self.current_trainee() else {
            return;
        };
        let entry = HistoryEntry::draft(
            trainee.id.clone(),
            trainee.name.clone(),
            action,
            description,
        );
        self.journal.push(entry);
    }

    // ---------------------------
    // Grid edits
    // ---------------------------

    /// Returns `false` (and records nothing) when the cell already holds `value`.
    pub fn update_cell(
        &mut self,
        block: usize,
        row: usize,
        col: usize,
        value: &str,
    ) -> AppResult<bool> {
        let program = self.block_mut(block)?;
        if !program.data.update_cell(row, col, value)? {
            return Ok(false);
        }
        let (id, title) = (program.id.clone(), program.title.clone());

        self.program_changes.mark_dirty(&id);
        self.log(Action::UpdateData, format!("in {title}: changed to \"{value}\""));
        Ok(true)
    }

    pub fn add_row(&mut self, block: usize) -> AppResult<()> {
        let program = self.block_mut(block)?;
        program.data.add_row();
        let (id, title) = (program.id.clone(), program.title.clone());

        self.program_changes.mark_dirty(&id);
        self.log(Action::AddRow, format!("in {title}"));
        Ok(())
    }

    pub fn delete_row(&mut self, block: usize, row: usize) -> AppResult<()> {
        let program = self.block_mut(block)?;
        program.data.delete_row(row)?;
        let (id, title) = (program.id.clone(), program.title.clone());

        self.program_changes.mark_dirty(&id);
        self.log(Action::DeleteRow, format!("in {title}"));
        Ok(())
    }

    pub fn add_column(&mut self, block: usize) -> AppResult<()> {
        let program = self.block_mut(block)?;
        program.data.add_column(NEW_COLUMN_LABEL);
        let (id, title) = (program.id.clone(), program.title.clone());

        self.program_changes.mark_dirty(&id);
        self.log(Action::AddColumn, format!("in {title}"));
        Ok(())
    }

    // ---------------------------
    // Blocks
    // ---------------------------

    pub fn rename_program(&mut self, block: usize, title: &str) -> AppResult<bool> {
        let program = self.block_mut(block)?;
        if program.title == title {
            return Ok(false);
        }
        let old = std::mem::replace(&mut program.title, title.to_string());
        let id = program.id.clone();

        self.program_changes.mark_dirty(&id);
        self.log(Action::RenameProgram, format!("from {old} to {title}"));
        Ok(true)
    }

    /// Trade places with the neighbouring block. Returns `false` at either end.
    pub fn move_block(&mut self, block: usize, direction: Direction) -> AppResult<bool> {
        self.block(block)?;
        let Some((a, b)) = move_block(&mut self.programs, block, direction) else {
            return Ok(false);
        };

        self.program_changes.mark_dirty(&a);
        self.program_changes.mark_dirty(&b);
        sort_by_order(&mut self.programs);
        self.log(Action::MoveProgram, "position changed");
        Ok(true)
    }

    /// New block with the default grid, placed after every existing block.
    pub fn add_program(&mut self, title: &str) -> AppResult<&Program> {
        self.add_program_with(title, Grid::default(), Action::AddProgram, title)
    }

    /// New block with given contents, kept unsaved until the next flush.
    pub fn add_program_with(
        &mut self,
        title: &str,
        data: Grid,
        action: Action,
        description: &str,
    ) -> AppResult<&Program> {
        let trainee_id = self.current_trainee().ok_or(AppError::NoTrainee)?.id.clone();
        let program = Program::draft(trainee_id, title, data, next_order_index(&self.programs));

        self.program_changes.mark_dirty(&program.id);
        self.programs.push(program);
        self.log(action, description);

        let last = self.programs.len() - 1;
        Ok(&self.programs[last])
    }

    /// Append a block that already reached the backend.
    pub fn push_saved_program(&mut self, program: Program, action: Action, description: &str) {
        self.programs.push(program);
        sort_by_order(&mut self.programs);
        self.log(action, description);
    }

    pub fn delete_program(&mut self, block: usize) -> AppResult<Program> {
        self.block(block)?;
        let program = self.programs.remove(block);

        self.program_changes.mark_deleted(&program.id);
        self.log(Action::DeleteProgram, program.title.clone());
        Ok(program)
    }

    // ---------------------------
    // Roster
    // ---------------------------

    /// Add an unsaved trainee and return its position in the roster.
    pub fn add_trainee(&mut self, name: &str) -> usize {
        let trainee = Trainee::draft(name);
        self.trainee_changes.mark_dirty(&trainee.id);
        self.trainees.push(trainee);
        self.log(Action::AddTrainee, name);
        self.trainees.len() - 1
    }

    pub fn rename_trainee(&mut self, name: &str) -> AppResult<bool> {
        let trainee = self
            .trainees
            .get_mut(self.current)
            .ok_or(AppError::NoTrainee)?;
        if trainee.name == name {
            return Ok(false);
        }
        let old = std::mem::replace(&mut trainee.name, name.to_string());
        let id = trainee.id.clone();

        self.trainee_changes.mark_dirty(&id);
        self.log(Action::RenameTrainee, format!("from {old} to {name}"));
        Ok(true)
    }

    /// Remove the current trainee. The roster never drops below one.
    /// Afterwards the first trainee is current; its programs must be loaded
    /// with [`Session::switch_to`].
    pub fn delete_trainee(&mut self) -> AppResult<Trainee> {
        if self.current_trainee().is_none() {
            return Err(AppError::NoTrainee);
        }
        if self.trainees.len() <= 1 {
            return Err(AppError::LastTrainee);
        }

        let trainee = self.trainees.remove(self.current);
        self.trainee_changes.mark_deleted(&trainee.id);
        // Its stored history goes with it; queued entries must not outlive it.
        self.journal.retain(|h| h.trainee_id != trainee.id);

        self.current = 0;
        self.log(Action::DeleteTrainee, trainee.name.clone());
        Ok(trainee)
    }

    // ---------------------------
    // Navigation
    // ---------------------------

    /// Show trainee `index` with `programs`. Pending program changes of the
    /// view being left are dropped; confirming that is the caller's job.
    pub fn switch_to(&mut self, index: usize, mut programs: Vec<Program>) -> AppResult<()> {
        if index >= self.trainees.len() {
            return Err(AppError::InvalidTrainee(index + 1));
        }
        sort_by_order(&mut programs);

        self.program_changes.clear();
        self.active_tab = Tab::Trainee;
        self.current = index;
        self.programs = programs;
        Ok(())
    }

    pub fn show_history(&mut self) {
        self.active_tab = Tab::History;
    }

    // ---------------------------
    // Reconciliation
    // ---------------------------

    /// The backend assigned `new` to the trainee known as `old`.
    pub fn remap_trainee(&mut self, old: &RecordId, new: &RecordId) {
        for t in self.trainees.iter_mut().filter(|t| &t.id == old) {
            t.id = new.clone();
        }
        for p in self.programs.iter_mut().filter(|p| &p.trainee_id == old) {
            p.trainee_id = new.clone();
        }
        for h in self.journal.iter_mut().filter(|h| &h.trainee_id == old) {
            h.trainee_id = new.clone();
        }
        self.trainee_changes.remap(old, new);
    }

    /// The backend assigned `new` to the program known as `old`.
    pub fn remap_program(&mut self, old: &RecordId, new: &RecordId) {
        for p in self.programs.iter_mut().filter(|p| &p.id == old) {
            p.id = new.clone();
        }
        self.program_changes.remap(old, new);
    }
}
