//! REST backend: JSON over HTTP against the MyFit API.
//!
//! Create and update are both `POST {base}/{collection}`; the server assigns
//! an id when the body has none and replaces the stored record otherwise.
//! Program grids travel as a JSON-encoded string in `data`.

use super::{EntityKind, Record, RecordStore, RecordStoreExt};
use crate::errors::{AppError, AppResult};
use crate::models::{Grid, HistoryEntry, Program, RecordId, Trainee};
use reqwest::blocking::{Client, Response};
use reqwest::{Method, Url};
use serde_json::Value;

pub struct RestStore {
    base: String,
    client: Client,
}

impl RestStore {
    pub fn new(api_base: &str) -> AppResult<Self> {
        let base = api_base.trim_end_matches('/').to_string();
        Url::parse(&base).map_err(|e| AppError::Config(format!("invalid API base '{base}': {e}")))?;

        let client = Client::builder().build()?;
        Ok(Self { base, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> AppResult<Response> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "api request");

        let mut req = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send()?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%method, %url, status = status.as_u16(), "api request failed");
            return Err(AppError::HttpStatus {
                method: method.to_string(),
                url,
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    fn get_json(&self, path: &str) -> AppResult<Value> {
        let resp = self.send(Method::GET, path, None)?;
        let text = resp.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn list_path(kind: EntityKind, filter: Option<&RecordId>) -> String {
        match (kind, filter) {
            (EntityKind::Trainee, _) | (_, None) => kind.collection().to_string(),
            (_, Some(trainee)) => format!("{}/trainee/{}", kind.collection(), trainee),
        }
    }
}

/// Serialize a record for the wire. Temporary ids are dropped so the server
/// assigns a canonical one.
fn encode(record: &Record) -> AppResult<Value> {
    let mut value = match record {
        Record::Trainee(t) => serde_json::to_value(t)?,
        Record::History(h) => serde_json::to_value(h)?,
        Record::Program(p) => {
            let mut v = serde_json::to_value(p)?;
            v["data"] = Value::String(serde_json::to_string(&p.data)?);
            v
        }
    };

    if record.id().is_temporary()
        && let Some(map) = value.as_object_mut()
    {
        map.remove("id");
    }
    Ok(value)
}

fn decode(kind: EntityKind, mut value: Value) -> AppResult<Record> {
    Ok(match kind {
        EntityKind::Trainee => Record::Trainee(serde_json::from_value::<Trainee>(value)?),
        EntityKind::History => Record::History(serde_json::from_value::<HistoryEntry>(value)?),
        EntityKind::Program => {
            // `data` is usually a JSON string; older records may hold the array inline.
            if let Some(Value::String(raw)) = value.get("data").cloned() {
                let grid: Grid = serde_json::from_str(&raw)?;
                value["data"] = serde_json::to_value(grid)?;
            }
            Record::Program(serde_json::from_value::<Program>(value)?)
        }
    })
}

impl RecordStore for RestStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }

    fn target(&self) -> String {
        self.base.clone()
    }

    fn ping(&mut self) -> AppResult<String> {
        let resp = self.send(Method::GET, "ping", None)?;
        Ok(resp.text()?)
    }

    fn list(&mut self, kind: EntityKind, filter: Option<&RecordId>) -> AppResult<Vec<Record>> {
        let value = self.get_json(&Self::list_path(kind, filter))?;
        let Value::Array(items) = value else {
            return Err(AppError::Store(format!(
                "expected a JSON array from /{}",
                kind.collection()
            )));
        };
        items.into_iter().map(|v| decode(kind, v)).collect()
    }

    fn create(&mut self, record: Record) -> AppResult<Record> {
        let kind = record.kind();
        let body = encode(&record)?;
        let resp = self.send(Method::POST, kind.collection(), Some(&body))?;
        let value: Value = resp.json()?;
        decode(kind, value)
    }

    fn update(&mut self, record: &Record) -> AppResult<()> {
        if record.id().is_temporary() {
            return Err(AppError::Store(format!(
                "cannot update unsaved {} record {}",
                record.kind(),
                record.id()
            )));
        }
        let body = encode(record)?;
        self.send(Method::POST, record.kind().collection(), Some(&body))?;
        Ok(())
    }

    fn delete(&mut self, kind: EntityKind, id: &RecordId) -> AppResult<()> {
        if kind == EntityKind::Trainee {
            // The API does not cascade; remove dependents one by one first.
            for program in self.programs_of(id)? {
                self.delete(EntityKind::Program, &program.id)?;
            }
            for entry in self.history(Some(id))? {
                self.delete(EntityKind::History, &entry.id)?;
            }
        }
        let path = format!("{}/{}", kind.collection(), id);
        self.send(Method::DELETE, &path, None)?;
        Ok(())
    }
}
