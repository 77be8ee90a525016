//! Application logic: the session state machine, its grid operations,
//! change tracking, backend synchronisation and file import.

pub mod buffer;
pub mod grid;
pub mod import;
pub mod legacy;
pub mod session;
pub mod sync;
pub mod tracker;

pub use session::{Session, Tab};
pub use tracker::DirtySet;
