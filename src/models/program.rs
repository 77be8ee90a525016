use super::grid::Grid;
use super::record_id::RecordId;
use serde::{Deserialize, Serialize};

/// Title of the block every seeded trainee starts with.
pub const DEFAULT_PROGRAM_TITLE: &str = "Workout A/אימון A";

/// One program block: a titled grid owned by a trainee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: RecordId,
    pub trainee_id: RecordId,
    pub title: String,
    pub data: Grid,
    #[serde(default)]
    pub order_index: i64,
}

impl Program {
    pub fn draft(trainee_id: RecordId, title: impl Into<String>, data: Grid, order_index: i64) -> Self {
        Self {
            id: RecordId::temporary(),
            trainee_id,
            title: title.into(),
            data,
            order_index,
        }
    }
}

/// Sort blocks into display order.
pub fn sort_by_order(programs: &mut [Program]) {
    programs.sort_by_key(|p| p.order_index);
}

/// Order index for a block appended after `programs`.
pub fn next_order_index(programs: &[Program]) -> i64 {
    programs
        .iter()
        .map(|p| p.order_index)
        .max()
        .map_or(0, |m| m + 1)
}
