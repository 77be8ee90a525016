//! `save` and `discard`.

use super::with_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::{flush, reload};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::ask_confirmation;

pub fn handle_save(cfg: &Config) -> AppResult<()> {
    with_session(cfg, |ctx| {
        if !ctx.session.needs_buffer() {
            info("Nothing to save");
            return Ok(());
        }
        let report = flush(ctx.store.as_mut(), &mut ctx.session)?;
        success(format!(
            "Saved {} change(s): trainees +{} ~{} -{}, programs +{} ~{} -{}, history {}",
            report.total(),
            report.trainees_created,
            report.trainees_updated,
            report.trainees_deleted,
            report.programs_created,
            report.programs_updated,
            report.programs_deleted,
            report.history_written
        ));
        Ok(())
    })
}

pub fn handle_discard(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Discard { force } = cmd else {
        return Ok(());
    };

    with_session(cfg, |ctx| {
        if !ctx.session.has_unsaved_changes() {
            info("Nothing to discard");
            return Ok(());
        }
        if !*force && !ask_confirmation("Drop all unsaved changes?") {
            info("Discard cancelled");
            return Ok(());
        }
        ctx.session = reload(ctx.store.as_mut(), &ctx.session)?;
        success("Unsaved changes discarded");
        Ok(())
    })
}
