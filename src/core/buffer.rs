//! On-disk copy of a session with unsaved work, so edits survive between
//! invocations until they are saved or discarded.

use super::session::Session;
use crate::errors::AppResult;
use crate::ui::messages::warning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct SessionBuffer {
    backend: String,
    target: String,
    session: Session,
}

/// Buffered session for the given backend, if any.
///
/// A buffer written against another backend or target is left on disk and
/// ignored; ids in it mean nothing here.
pub fn load(path: &Path, backend: &str, target: &str) -> AppResult<Option<Session>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let buffer: SessionBuffer = match serde_json::from_str(&content) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable session buffer");
            warning(format!(
                "Ignoring unreadable unsaved-changes file {}",
                path.display()
            ));
            return Ok(None);
        }
    };

    if buffer.backend != backend || buffer.target != target {
        warning(format!(
            "Unsaved changes belong to {} ({}); not applied to {} ({})",
            buffer.backend, buffer.target, backend, target
        ));
        return Ok(None);
    }
    Ok(Some(buffer.session))
}

/// Write `session` to `path` while it has pending work, remove the file otherwise.
pub fn persist(path: &Path, backend: &str, target: &str, session: &Session) -> AppResult<()> {
    if !session.needs_buffer() {
        let foreign = fs::read_to_string(path)
            .ok()
            .and_then(|c| serde_json::from_str::<SessionBuffer>(&c).ok())
            .is_some_and(|b| b.backend != backend || b.target != target);
        if path.exists() && !foreign {
            fs::remove_file(path)?;
            tracing::debug!(path = %path.display(), "session buffer removed");
        }
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let buffer = SessionBuffer {
        backend: backend.to_string(),
        target: target.to_string(),
        session: session.clone(),
    };
    fs::write(path, serde_json::to_string_pretty(&buffer)?)?;
    tracing::debug!(path = %path.display(), "session buffer written");
    Ok(())
}
