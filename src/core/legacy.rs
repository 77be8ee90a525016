//! One-shot import of the local state file written by old releases.
//!
//! The old format kept everything in one JSON document:
//! `{ "trainees": [{ "name", "blocks": [{ "title", "data" }] }], "history": [...] }`.
//! History entries refer to their trainee by name.

use crate::errors::AppResult;
use crate::models::{Grid, HistoryEntry, Program, RecordId, Trainee};
use crate::store::{RecordStore, RecordStoreExt};
use crate::ui::messages::{info, success};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LegacyState {
    #[serde(default)]
    trainees: Vec<LegacyTrainee>,
    #[serde(default)]
    history: Vec<LegacyHistory>,
}

#[derive(Debug, Deserialize)]
struct LegacyTrainee {
    name: String,
    #[serde(default)]
    blocks: Vec<LegacyBlock>,
}

#[derive(Debug, Deserialize)]
struct LegacyBlock {
    #[serde(default)]
    title: String,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyHistory {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    trainee_name: String,
    #[serde(default)]
    action: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LegacyReport {
    pub trainees: usize,
    pub programs: usize,
    pub history: usize,
}

/// Text shown for a cell of any JSON type.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Import `path` into `store` and delete it. `Ok(None)` when there is no file.
pub fn migrate_legacy_state(
    store: &mut dyn RecordStore,
    path: &Path,
) -> AppResult<Option<LegacyReport>> {
    if !path.exists() {
        return Ok(None);
    }

    info(format!("Migrating legacy local data from {}", path.display()));
    let content = fs::read_to_string(path)?;
    let state: LegacyState = serde_json::from_str(&content)?;

    let mut report = LegacyReport::default();
    let mut ids_by_name: HashMap<String, RecordId> = HashMap::new();

    for legacy in state.trainees {
        let trainee = store.create_trainee(Trainee::draft(&legacy.name))?;
        report.trainees += 1;

        for (order, block) in legacy.blocks.into_iter().enumerate() {
            let rows = block
                .data
                .iter()
                .map(|row| row.iter().map(cell_text).collect())
                .collect();
            store.create_program(Program::draft(
                trainee.id.clone(),
                block.title,
                Grid::from_rows(rows),
                order as i64,
            ))?;
            report.programs += 1;
        }

        ids_by_name.entry(legacy.name).or_insert(trainee.id);
    }

    for h in state.history {
        // Entries of trainees that no longer exist have nowhere to go.
        let Some(trainee_id) = ids_by_name.get(&h.trainee_name) else {
            continue;
        };
        let entry = HistoryEntry {
            id: RecordId::temporary(),
            timestamp: h.timestamp,
            trainee_id: trainee_id.clone(),
            trainee_name: h.trainee_name,
            action: h.action,
            description: h.description,
        };
        store.append_history(entry)?;
        report.history += 1;
    }

    fs::remove_file(path)?;
    success(format!(
        "Legacy data migrated: {} trainees, {} programs, {} history entries",
        report.trainees, report.programs, report.history
    ));
    Ok(Some(report))
}
