use super::record_id::RecordId;
use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainee {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>, // ISO 8601, local time
}

impl Trainee {
    /// A trainee that only exists on this side until the next save.
    pub fn draft(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::temporary(),
            name: name.into(),
            created_at: Some(Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}
