use crate::errors::{AppError, AppResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod preferences;

pub use preferences::{Preferences, Theme, ViewMode};

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Which persistence backend holds the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local SQLite file
    Embedded,
    /// Remote MyFit REST API
    Rest,
}

/// Backend selection, resolved once at startup and handed to `store::open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    Rest { api_base: String },
    Embedded { database: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backend")]
    pub backend: BackendKind,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_backend() -> BackendKind {
    BackendKind::Embedded
}
fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database: default_database(),
            api_base: default_api_base(),
        }
    }
}

impl Config {
    /// Return the configuration directory (`~/.myfit`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".myfit")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("myfit.conf")
    }

    /// Return the default path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("myfit.sqlite")
    }

    /// Unsaved edits between invocations.
    pub fn session_file() -> PathBuf {
        Self::config_dir().join("session.json")
    }

    /// View mode, theme and selected trainee.
    pub fn preferences_file() -> PathBuf {
        Self::config_dir().join("preferences.json")
    }

    /// Local state written by old releases, imported once into the embedded store.
    pub fn legacy_state_file() -> PathBuf {
        Self::config_dir().join("myfit_data.json")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self) -> AppResult<PathBuf> {
        fs::create_dir_all(Self::config_dir())?;
        let path = Self::config_file();
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }

    pub fn backend_config(&self) -> BackendConfig {
        match self.backend {
            BackendKind::Rest => BackendConfig::Rest {
                api_base: self.api_base.clone(),
            },
            BackendKind::Embedded => BackendConfig::Embedded {
                database: self.database.clone(),
            },
        }
    }
}
