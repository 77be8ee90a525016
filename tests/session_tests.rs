use myfit::core::grid::Direction;
use myfit::core::{DirtySet, Session, Tab};
use myfit::errors::AppError;
use myfit::models::{Action, HistoryEntry, RecordId};

mod common;
use common::{program, trainee};

/// Two saved trainees; the first one has blocks "A" (order 0) and "B" (order 1).
fn session() -> Session {
    Session::new(
        vec![trainee(1, "Dana"), trainee(2, "Noam")],
        0,
        vec![program(11, 1, "B", 1), program(10, 1, "A", 0)],
    )
}

// ---------------------------
// DirtySet
// ---------------------------

#[test]
fn dirty_marks_coalesce() {
    let mut set = DirtySet::new();
    let id = RecordId::from(5);
    set.mark_dirty(&id);
    set.mark_dirty(&id);
    assert_eq!(set.dirty_len(), 1);
    assert!(set.is_dirty(&id));
    assert!(set.is_pending());
}

#[test]
fn deleting_a_saved_record_replaces_its_pending_write() {
    let mut set = DirtySet::new();
    let id = RecordId::from(5);
    set.mark_dirty(&id);
    set.mark_deleted(&id);
    assert!(!set.is_dirty(&id));
    assert!(set.is_deleted(&id));
}

#[test]
fn deleting_an_unsaved_record_forgets_it() {
    let mut set = DirtySet::new();
    let id = RecordId::temporary();
    set.mark_dirty(&id);
    set.mark_deleted(&id);
    assert!(!set.is_pending());
}

#[test]
fn remap_moves_pending_write_to_new_id() {
    let mut set = DirtySet::new();
    let temp = RecordId::temporary();
    set.mark_dirty(&temp);
    set.remap(&temp, &RecordId::from(77));
    assert!(set.is_dirty(&RecordId::from(77)));
    assert!(!set.is_dirty(&temp));

    set.clear();
    assert!(!set.is_pending());
}

// ---------------------------
// Session
// ---------------------------

#[test]
fn new_session_sorts_blocks_and_clamps_current() {
    let s = Session::new(vec![trainee(1, "Dana")], 7, vec![program(2, 1, "B", 5), program(1, 1, "A", 2)]);
    assert_eq!(s.current, 0);
    assert_eq!(s.programs[0].title, "A");
    assert_eq!(s.active_tab, Tab::Trainee);
    assert!(!s.needs_buffer());
}

#[test]
fn squat_edit_changes_cell_and_queues_history() {
    let mut s = session();
    assert!(s.update_cell(0, 1, 0, "Squat").unwrap());

    assert_eq!(
        s.programs[0].data.rows(),
        [
            vec!["Exercise", "Sets", "Reps", "Weight"],
            vec!["Squat", "", "", ""]
        ]
        .map(|r| r.into_iter().map(String::from).collect::<Vec<_>>())
        .as_slice()
    );
    assert!(s.program_changes.is_dirty(&RecordId::from(10)));
    assert_eq!(s.journal.len(), 1);
    let entry = &s.journal[0];
    assert_eq!(entry.action, Action::UpdateData.as_str());
    assert_eq!(entry.action, "update data");
    assert_eq!(entry.description, "in A: changed to \"Squat\"");
    assert_eq!(entry.trainee_id, RecordId::from(1));
    assert_eq!(entry.trainee_name, "Dana");
}

#[test]
fn unchanged_value_marks_nothing() {
    let mut s = session();
    s.update_cell(0, 1, 0, "Squat").unwrap();
    s.program_changes.clear();
    s.journal.clear();

    for _ in 0..3 {
        assert!(!s.update_cell(0, 1, 0, "Squat").unwrap());
    }
    assert!(!s.program_changes.is_pending());
    assert!(s.journal.is_empty());
}

#[test]
fn invalid_block_is_reported_one_based() {
    let mut s = session();
    assert!(matches!(s.add_row(5), Err(AppError::InvalidBlock(6))));
    assert!(s.journal.is_empty());
}

#[test]
fn row_and_column_edits_are_tracked() {
    let mut s = session();
    s.add_row(1).unwrap();
    s.add_column(1).unwrap();
    s.delete_row(1, 2).unwrap();
    assert!(matches!(s.delete_row(1, 0), Err(AppError::HeaderRowProtected)));

    let actions: Vec<&str> = s.journal.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, ["add row", "add column", "delete row"]);
    assert!(s.journal.iter().all(|h| h.description == "in B"));
    assert!(s.programs[1].data.is_rectangular());
    assert_eq!(s.program_changes.dirty_len(), 1);
}

#[test]
fn move_block_round_trip_restores_order_indexes() {
    let mut s = session();
    assert!(s.move_block(0, Direction::Down).unwrap());
    assert_eq!(s.programs[0].title, "B");
    assert_eq!(s.program_changes.dirty_len(), 2);
    assert_eq!(s.journal[0].action, "move program");
    assert_eq!(s.journal[0].description, "position changed");

    assert!(s.move_block(1, Direction::Up).unwrap());
    assert_eq!(
        s.programs.iter().map(|p| (p.title.as_str(), p.order_index)).collect::<Vec<_>>(),
        [("A", 0), ("B", 1)]
    );
}

#[test]
fn move_block_past_the_edge_changes_nothing() {
    let mut s = session();
    assert!(!s.move_block(0, Direction::Up).unwrap());
    assert!(!s.move_block(1, Direction::Down).unwrap());
    assert!(!s.program_changes.is_pending());
    assert!(s.journal.is_empty());
}

#[test]
fn rename_program_logs_old_and_new_title() {
    let mut s = session();
    assert!(!s.rename_program(0, "A").unwrap());
    assert!(s.rename_program(0, "Legs").unwrap());
    assert_eq!(s.journal[0].description, "from A to Legs");
}

#[test]
fn added_program_goes_last_with_temporary_id() {
    let mut s = session();
    let added = s.add_program("Push").unwrap().clone();
    assert!(added.id.is_temporary());
    assert_eq!(added.order_index, 2);
    assert_eq!(added.trainee_id, RecordId::from(1));
    assert_eq!(added.data.height(), 2);
    assert!(s.program_changes.is_dirty(&added.id));
    assert_eq!(s.journal[0].action, "add program (pending save)");

    // Deleting it again leaves nothing to flush.
    s.delete_program(2).unwrap();
    assert!(!s.program_changes.is_pending());
}

#[test]
fn deleting_a_saved_program_queues_its_deletion() {
    let mut s = session();
    let gone = s.delete_program(0).unwrap();
    assert_eq!(gone.title, "A");
    assert!(s.program_changes.is_deleted(&RecordId::from(10)));
    assert_eq!(s.programs.len(), 1);
    assert_eq!(s.journal[0].action, "delete program (pending save)");
}

#[test]
fn trainee_roster_changes() {
    let mut s = session();
    let index = s.add_trainee("Tal");
    assert_eq!(index, 2);
    let tal = s.trainees[2].id.clone();
    assert!(tal.is_temporary());
    assert!(s.trainee_changes.is_dirty(&tal));
    // Logged against the trainee that was current.
    assert_eq!(s.journal[0].trainee_name, "Dana");
    assert_eq!(s.journal[0].description, "Tal");

    assert!(s.rename_trainee("Dana K").unwrap());
    assert!(!s.rename_trainee("Dana K").unwrap());
    assert_eq!(s.journal[1].description, "from Dana to Dana K");
}

#[test]
fn deleting_the_last_trainee_is_refused() {
    let mut s = Session::new(vec![trainee(1, "Dana")], 0, Vec::new());
    assert!(matches!(s.delete_trainee(), Err(AppError::LastTrainee)));
    assert_eq!(s.trainees.len(), 1);
}

#[test]
fn deleting_a_trainee_resets_to_the_first() {
    let mut s = session();
    s.switch_to(1, Vec::new()).unwrap();
    let gone = s.delete_trainee().unwrap();
    assert_eq!(gone.name, "Noam");
    assert_eq!(s.current, 0);
    assert!(s.trainee_changes.is_deleted(&RecordId::from(2)));
    assert_eq!(s.journal[0].action, "delete trainee (pending save)");
    assert_eq!(s.journal[0].trainee_id, RecordId::from(1));
}

#[test]
fn deleting_an_unsaved_trainee_drops_its_queued_history() {
    let mut s = session();
    let index = s.add_trainee("Tal");
    s.switch_to(index, Vec::new()).unwrap();
    s.add_program("Pull").unwrap();
    assert_eq!(s.journal.len(), 2);

    s.delete_trainee().unwrap();
    assert!(!s.trainee_changes.is_pending());
    // Only the deletion itself (logged against Dana) and the add remain.
    assert!(s.journal.iter().all(|h| h.trainee_id.is_durable()));
}

#[test]
fn deleting_a_saved_trainee_drops_its_queued_history() {
    let mut s = session();
    s.switch_to(1, Vec::new()).unwrap();
    s.journal.push(HistoryEntry::draft(RecordId::from(2), "Noam", Action::AddRow, "in C"));

    s.delete_trainee().unwrap();
    assert!(s.journal.iter().all(|h| h.trainee_id != RecordId::from(2)));
    assert_eq!(s.journal.len(), 1);
}

#[test]
fn switching_drops_program_changes_but_keeps_roster_changes() {
    let mut s = session();
    s.update_cell(0, 1, 1, "5").unwrap();
    s.add_trainee("Tal");
    assert!(s.has_unsaved_view_changes());

    s.show_history();
    s.switch_to(1, vec![program(20, 2, "C", 0)]).unwrap();
    assert_eq!(s.active_tab, Tab::Trainee);
    assert_eq!(s.current, 1);
    assert_eq!(s.programs[0].title, "C");
    assert!(!s.has_unsaved_view_changes());
    assert!(s.has_unsaved_changes());

    assert!(matches!(s.switch_to(9, Vec::new()), Err(AppError::InvalidTrainee(10))));
}

#[test]
fn remap_trainee_updates_every_reference() {
    let mut s = session();
    let index = s.add_trainee("Tal");
    s.switch_to(index, Vec::new()).unwrap();
    s.add_program("Pull").unwrap();
    let temp = s.trainees[index].id.clone();

    let saved = RecordId::from(500);
    s.remap_trainee(&temp, &saved);
    assert_eq!(s.trainees[index].id, saved);
    assert_eq!(s.programs[0].trainee_id, saved);
    assert!(s.journal.iter().any(|h| h.trainee_id == saved));
    assert!(s.trainee_changes.is_dirty(&saved));
}

#[test]
fn session_survives_a_json_round_trip() {
    let mut s = session();
    s.update_cell(0, 1, 0, "Squat").unwrap();
    s.add_trainee("Tal");
    let json = serde_json::to_string(&s).unwrap();
    let back: Session = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}
