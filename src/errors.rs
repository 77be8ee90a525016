//! Unified application error type.
//! All modules (store, db, core, cli, ui) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Backend-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status} for {method} {url}")]
    HttpStatus {
        method: String,
        url: String,
        status: u16,
    },

    #[error("Unexpected record from store: {0}")]
    Store(String),

    #[error("Could not reach the data backend at {target}: {reason}")]
    Startup {
        backend: String,
        target: String,
        reason: String,
    },

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Grid / session errors
    // ---------------------------
    #[error("No program block #{0}")]
    InvalidBlock(usize),

    #[error("No row {0} in this program")]
    InvalidRow(usize),

    #[error("No cell at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize },

    #[error("The header row cannot be deleted")]
    HeaderRowProtected,

    #[error("No trainee #{0}")]
    InvalidTrainee(usize),

    #[error("At least one trainee must remain")]
    LastTrainee,

    #[error("No trainee selected")]
    NoTrainee,

    // ---------------------------
    // Import errors
    // ---------------------------
    #[error("Import format not supported: {0}")]
    UnsupportedImport(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Remediation hints printed under a fatal startup error.
    pub fn hints(&self) -> Vec<String> {
        match self {
            AppError::Startup {
                backend, target, ..
            } if backend == "rest" => vec![
                format!("Target API base: {target}"),
                "Make sure the API server is running and listening on that address.".to_string(),
                "Check `api_base` in the configuration file or pass --api <URL>.".to_string(),
                "Retry the command once the server answers on /ping.".to_string(),
            ],
            AppError::Startup { target, .. } => vec![
                format!("Database file: {target}"),
                "Run `myfit init` to create the database and configuration.".to_string(),
                "Check that the directory exists and is writable.".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
