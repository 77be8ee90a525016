use myfit::config::Preferences;
use myfit::core::sync::{bootstrap, flush};
use myfit::errors::AppError;
use myfit::models::RecordId;
use myfit::store::rest::RestStore;
use myfit::store::{EntityKind, RecordStore, RecordStoreExt};
use serde_json::json;

mod common;
use common::{FakeApi, dead_api_base};

fn store(api: &FakeApi) -> RestStore {
    RestStore::new(&api.base).expect("rest store")
}

#[test]
fn ping_hits_the_ping_endpoint() {
    let api = FakeApi::start();
    let mut store = store(&api);
    assert_eq!(store.ping().unwrap(), "pong");
    assert_eq!(api.requests(), ["GET /api/ping"]);
    assert_eq!(store.backend_name(), "rest");
}

#[test]
fn bootstrap_seeds_through_the_api() {
    let api = FakeApi::start();
    let mut store = store(&api);
    let session = bootstrap(&mut store, &Preferences::default(), None, None).unwrap();

    assert_eq!(session.trainees.len(), 2);
    assert!(session.trainees.iter().all(|t| t.id.as_i64().is_some()));
    assert_eq!(session.programs.len(), 1);
    assert_eq!(session.programs[0].data.width(), 4);

    api.with_state(|st| {
        assert_eq!(st.trainees.len(), 2);
        assert_eq!(st.programs.len(), 2);
        let program = st
            .posted
            .iter()
            .find(|b| b.get("title").is_some())
            .expect("program body");
        // Grids travel as JSON text; the server picks the id.
        assert!(program["data"].is_string());
        assert!(program.get("id").is_none());
        let grid: Vec<Vec<String>> =
            serde_json::from_str(program["data"].as_str().unwrap()).unwrap();
        assert_eq!(grid[0][0], "Exercise/תרגיל");
    });
}

#[test]
fn program_data_is_read_as_string_or_inline_array() {
    let api = FakeApi::start();
    api.with_state(|st| {
        st.programs.push(json!({
            "id": 1, "traineeId": 7, "title": "Text", "orderIndex": 1,
            "data": "[[\"A\",\"B\"],[\"1\",\"2\"]]"
        }));
        st.programs.push(json!({
            "id": "2", "traineeId": "7", "title": "Inline", "orderIndex": 0,
            "data": [["A"],["x"]]
        }));
    });

    let mut store = store(&api);
    let programs = store.programs_of(&RecordId::from(7)).unwrap();
    assert_eq!(api.requests(), ["GET /api/programs/trainee/7"]);
    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0].title, "Inline");
    assert_eq!(programs[0].id, RecordId::from(2));
    assert_eq!(programs[1].data.cell(1, 1), Some("2"));
}

#[test]
fn trainee_delete_removes_dependents_one_by_one() {
    let api = FakeApi::start();
    api.with_state(|st| {
        st.trainees.push(json!({"id": 1, "name": "Dana"}));
        st.programs.push(json!({"id": 10, "traineeId": 1, "title": "A", "data": "[[\"\"]]", "orderIndex": 0}));
        st.programs.push(json!({"id": 11, "traineeId": 1, "title": "B", "data": "[[\"\"]]", "orderIndex": 1}));
        st.history.push(json!({
            "id": 20, "timestamp": "1.3.2025, 10:00:00", "traineeId": 1,
            "traineeName": "Dana", "action": "add row", "description": "in A"
        }));
    });

    let mut store = store(&api);
    store.delete(EntityKind::Trainee, &RecordId::from(1)).unwrap();

    assert_eq!(
        api.requests(),
        [
            "GET /api/programs/trainee/1",
            "DELETE /api/programs/10",
            "DELETE /api/programs/11",
            "GET /api/history/trainee/1",
            "DELETE /api/history/20",
            "DELETE /api/trainees/1",
        ]
    );
    api.with_state(|st| {
        assert!(st.trainees.is_empty());
        assert!(st.programs.is_empty());
        assert!(st.history.is_empty());
    });
}

#[test]
fn non_success_status_is_an_error() {
    let api = FakeApi::start();
    api.fail("GET /api/trainees");
    let mut store = store(&api);

    match store.trainees() {
        Err(AppError::HttpStatus { method, status, .. }) => {
            assert_eq!(method, "GET");
            assert_eq!(status, 500);
        }
        other => panic!("expected an HTTP status error, got {other:?}"),
    }
}

#[test]
fn unreachable_api_is_a_startup_error_with_hints() {
    let base = dead_api_base();
    let mut store = RestStore::new(&base).unwrap();
    let err = bootstrap(&mut store, &Preferences::default(), None, None).unwrap_err();

    assert!(matches!(err, AppError::Startup { .. }));
    let hints = err.hints().join("\n");
    assert!(hints.contains(&base));
    assert!(hints.contains("API server"));
}

#[test]
fn invalid_api_base_is_rejected() {
    assert!(matches!(
        RestStore::new("not a url"),
        Err(AppError::Config(_))
    ));
}

#[test]
fn flush_creates_new_trainee_then_its_program() {
    let api = FakeApi::start();
    let mut store = store(&api);
    let mut session = bootstrap(&mut store, &Preferences::default(), None, None).unwrap();

    let index = session.add_trainee("Tal");
    session.switch_to(index, Vec::new()).unwrap();
    session.add_program("Pull").unwrap();

    let report = flush(&mut store, &mut session).unwrap();
    assert_eq!(report.trainees_created, 1);
    assert_eq!(report.programs_created, 1);

    let tal = session.trainees[index].id.clone();
    api.with_state(|st| {
        let program = st
            .programs
            .iter()
            .find(|p| p["title"] == "Pull")
            .expect("stored program");
        assert_eq!(program["traineeId"].to_string(), tal.to_string());
    });
}

#[test]
fn failed_write_stays_pending() {
    let api = FakeApi::start();
    let mut store = store(&api);
    let mut session = bootstrap(&mut store, &Preferences::default(), None, None).unwrap();

    session.rename_trainee("Dana").unwrap();
    session.update_cell(0, 1, 0, "Squat").unwrap();
    api.fail("POST /api/programs");

    assert!(flush(&mut store, &mut session).is_err());
    // The trainee went through; the program did not.
    assert!(!session.trainee_changes.is_pending());
    assert!(session.program_changes.is_pending());
    assert!(session.needs_buffer());
}
