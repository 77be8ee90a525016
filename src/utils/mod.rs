pub mod prompt;
pub mod table;

pub use prompt::ask_confirmation;
