use super::open_store;
use crate::config::{BackendConfig, Config, Preferences};
use crate::core::sync::bootstrap;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (with any command-line overrides)
///  - the backend (SQLite schema migrations, or a ping of the REST API)
///  - the default roster when the store is empty
pub fn handle(cfg: &Config) -> AppResult<()> {
    let path = cfg.save()?;
    let target = match cfg.backend_config() {
        BackendConfig::Rest { api_base } => api_base,
        BackendConfig::Embedded { database } => database,
    };

    println!("⚙️  Initializing MyFit…");
    println!("📄 Config file : {}", path.display());
    println!("🗄️  Backend    : {:?} ({})", cfg.backend, target);

    let mut store = open_store(cfg)?;
    let prefs = Preferences::load()?;
    let session = bootstrap(
        store.as_mut(),
        &prefs,
        Some(&Config::legacy_state_file()),
        None,
    )?;

    success(format!(
        "Store ready with {} trainee(s)",
        session.trainees.len()
    ));
    println!("🎉 MyFit initialization completed!");
    Ok(())
}
