#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use myfit::models::{Grid, Program, RecordId, Trainee};
use serde_json::{Value, json};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;
use tiny_http::{Response, Server};

/// `myfit` binary running with `home` as its home directory, so the config,
/// preferences, session buffer and default database all live there.
pub fn myfit(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("myfit");
    cmd.env("HOME", home).env_remove("MYFIT_LOG");
    cmd
}

/// Fresh home directory for one test.
pub fn test_home() -> TempDir {
    tempfile::tempdir().expect("temp home")
}

/// Path of a scratch file inside `dir`.
pub fn scratch(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

pub fn trainee(id: i64, name: &str) -> Trainee {
    Trainee {
        id: RecordId::from(id),
        name: name.to_string(),
        created_at: None,
    }
}

pub fn program(id: i64, trainee_id: i64, title: &str, order_index: i64) -> Program {
    Program {
        id: RecordId::from(id),
        trainee_id: RecordId::from(trainee_id),
        title: title.to_string(),
        data: Grid::with_header(&["Exercise", "Sets", "Reps", "Weight"]),
        order_index,
    }
}

// ---------------------------
// Fake REST API
// ---------------------------

/// In-memory stand-in for the MyFit API.
#[derive(Debug, Default)]
pub struct ApiState {
    pub trainees: Vec<Value>,
    pub programs: Vec<Value>,
    pub history: Vec<Value>,
    pub next_id: i64,
    /// `"METHOD /path"` of every request, in arrival order.
    pub requests: Vec<String>,
    /// Bodies of every POST, in arrival order.
    pub posted: Vec<Value>,
    /// Requests (`"METHOD /path"`) answered with a 500.
    pub failing: Vec<String>,
}

impl ApiState {
    fn collection(&mut self, name: &str) -> Option<&mut Vec<Value>> {
        match name {
            "trainees" => Some(&mut self.trainees),
            "programs" => Some(&mut self.programs),
            "history" => Some(&mut self.history),
            _ => None,
        }
    }
}

pub fn id_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct FakeApi {
    pub base: String,
    pub state: Arc<Mutex<ApiState>>,
}

impl FakeApi {
    pub fn start() -> Self {
        let server = Server::http("127.0.0.1:0").expect("http server");
        let addr = server.server_addr().to_ip().expect("tcp address");
        let state = Arc::new(Mutex::new(ApiState {
            next_id: 1000,
            ..ApiState::default()
        }));

        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for mut req in server.incoming_requests() {
                let method = req.method().to_string();
                let url = req.url().to_string();
                let mut body = String::new();
                let _ = req.as_reader().read_to_string(&mut body);

                let (status, payload) = route(&shared, &method, &url, &body);
                let _ = req.respond(Response::from_string(payload).with_status_code(status));
            }
        });

        Self {
            base: format!("http://{addr}/api"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().expect("state").requests.clone()
    }

    pub fn fail(&self, request: &str) {
        self.state
            .lock()
            .expect("state")
            .failing
            .push(request.to_string());
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut ApiState) -> T) -> T {
        f(&mut self.state.lock().expect("state"))
    }
}

fn route(state: &Mutex<ApiState>, method: &str, url: &str, body: &str) -> (u16, String) {
    let mut st = state.lock().expect("state");
    let request = format!("{method} {url}");
    st.requests.push(request.clone());
    if st.failing.contains(&request) {
        return (500, json!({"error": "boom"}).to_string());
    }

    let path = url.strip_prefix("/api/").unwrap_or(url);
    let segments: Vec<&str> = path.split('/').collect();

    match (method, segments.as_slice()) {
        ("GET", ["ping"]) => (200, "pong".to_string()),
        ("GET", [name]) => match st.collection(name) {
            Some(items) => (200, Value::Array(items.clone()).to_string()),
            None => (404, String::new()),
        },
        ("GET", [name, "trainee", id]) => match st.collection(name) {
            Some(items) => {
                let owned: Vec<Value> = items
                    .iter()
                    .filter(|v| id_text(&v["traineeId"]) == *id)
                    .cloned()
                    .collect();
                (200, Value::Array(owned).to_string())
            }
            None => (404, String::new()),
        },
        ("POST", [name]) => {
            let Ok(mut record) = serde_json::from_str::<Value>(body) else {
                return (400, String::new());
            };
            st.posted.push(record.clone());
            if record.get("id").is_none() {
                st.next_id += 1;
                record["id"] = json!(st.next_id);
            }
            let Some(items) = st.collection(name) else {
                return (404, String::new());
            };
            let id = id_text(&record["id"]);
            match items.iter_mut().find(|v| id_text(&v["id"]) == id) {
                Some(existing) => *existing = record.clone(),
                None => items.push(record.clone()),
            }
            (200, record.to_string())
        }
        ("DELETE", [name, id]) => match st.collection(name) {
            Some(items) => {
                items.retain(|v| id_text(&v["id"]) != *id);
                (200, String::new())
            }
            None => (404, String::new()),
        },
        _ => (404, String::new()),
    }
}

/// An address nothing listens on.
pub fn dead_api_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/api")
}
