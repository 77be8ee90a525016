use super::record_id::RecordId;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// What an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateData,
    AddRow,
    DeleteRow,
    AddColumn,
    RenameProgram,
    MoveProgram,
    AddProgram,
    DeleteProgram,
    AddTrainee,
    RenameTrainee,
    DeleteTrainee,
    ImportFile,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::UpdateData => "update data",
            Action::AddRow => "add row",
            Action::DeleteRow => "delete row",
            Action::AddColumn => "add column",
            Action::RenameProgram => "rename program",
            Action::MoveProgram => "move program",
            Action::AddProgram => "add program (pending save)",
            Action::DeleteProgram => "delete program (pending save)",
            Action::AddTrainee => "add trainee (pending save)",
            Action::RenameTrainee => "rename trainee",
            Action::DeleteTrainee => "delete trainee (pending save)",
            Action::ImportFile => "import file",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            Action::UpdateData,
            Action::AddRow,
            Action::DeleteRow,
            Action::AddColumn,
            Action::RenameProgram,
            Action::MoveProgram,
            Action::AddProgram,
            Action::DeleteProgram,
            Action::AddTrainee,
            Action::RenameTrainee,
            Action::DeleteTrainee,
            Action::ImportFile,
        ]
        .into_iter()
        .find(|a| a.as_str() == s)
    }
}

/// One line of the audit trail. Never modified once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: RecordId,
    pub timestamp: String,
    pub trainee_id: RecordId,
    pub trainee_name: String,
    pub action: String,
    pub description: String,
}

impl HistoryEntry {
    pub fn draft(
        trainee_id: RecordId,
        trainee_name: impl Into<String>,
        action: Action,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::temporary(),
            timestamp: display_timestamp(),
            trainee_id,
            trainee_name: trainee_name.into(),
            action: action.as_str().to_string(),
            description: description.into(),
        }
    }
}

/// `D.M.YYYY, HH:MM:SS` in local time.
pub fn display_timestamp() -> String {
    Local::now().format("%-d.%-m.%Y, %H:%M:%S").to_string()
}
