pub mod grid;
pub mod history;
pub mod program;
pub mod record_id;
pub mod trainee;

pub use grid::Grid;
pub use history::{Action, HistoryEntry};
pub use program::Program;
pub use record_id::RecordId;
pub use trainee::Trainee;
