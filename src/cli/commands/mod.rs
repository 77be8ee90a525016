pub mod config;
pub mod edit;
pub mod history;
pub mod import;
pub mod init;
pub mod prefs;
pub mod program;
pub mod save;
pub mod show;
pub mod status;
pub mod switch;
pub mod trainee;

use crate::config::{BackendConfig, Config, Preferences};
use crate::core::{Session, buffer, sync};
use crate::errors::{AppError, AppResult};
use crate::store::{self, RecordStore};
use crate::ui::messages::warning;

/// Everything a command works on: the open backend, the session and the
/// display preferences.
pub struct Context {
    pub store: Box<dyn RecordStore>,
    pub session: Session,
    pub prefs: Preferences,
}

/// Open the configured backend; failures are fatal startup errors.
pub fn open_store(cfg: &Config) -> AppResult<Box<dyn RecordStore>> {
    let backend = cfg.backend_config();
    store::open(&backend).map_err(|e| {
        let (name, target) = match &backend {
            BackendConfig::Rest { api_base } => ("rest", api_base.clone()),
            BackendConfig::Embedded { database } => ("embedded", database.clone()),
        };
        AppError::Startup {
            backend: name.to_string(),
            target,
            reason: e.to_string(),
        }
    })
}

/// Block numbers are shown from 1.
pub fn block_index(number: usize) -> AppResult<usize> {
    number.checked_sub(1).ok_or(AppError::InvalidBlock(number))
}

/// Run `f` against a started session.
///
/// Afterwards queued history is written, and the session is buffered to disk
/// while anything is still pending (even when `f` failed). The selected
/// trainee is remembered in the preferences.
pub fn with_session<F>(cfg: &Config, f: F) -> AppResult<()>
where
    F: FnOnce(&mut Context) -> AppResult<()>,
{
    let prefs = Preferences::load()?;
    let mut store = open_store(cfg)?;
    let backend = store.backend_name();
    let target = store.target();
    let buffer_path = Config::session_file();

    let buffered = buffer::load(&buffer_path, backend, &target)?;
    let session = sync::bootstrap(
        store.as_mut(),
        &prefs,
        Some(&Config::legacy_state_file()),
        buffered,
    )?;

    let mut ctx = Context {
        store,
        session,
        prefs: prefs.clone(),
    };
    let result = f(&mut ctx);

    let drained = sync::drain_journal(ctx.store.as_mut(), &mut ctx.session);
    if let Ok(n) = &drained {
        tracing::debug!(written = n, "history journal drained");
    }
    buffer::persist(&buffer_path, backend, &target, &ctx.session)?;

    ctx.prefs.current_trainee_index = ctx.session.current;
    if ctx.prefs != prefs {
        ctx.prefs.save()?;
    }

    match (result, drained) {
        (Err(e), Err(journal)) => {
            warning(format!("History not written yet: {journal}"));
            Err(e)
        }
        (Err(e), Ok(_)) => Err(e),
        (Ok(()), Err(journal)) => Err(journal),
        (Ok(()), Ok(_)) => Ok(()),
    }
}
