use super::with_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::programs_for;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::ask_confirmation;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Switch { number, force } = cmd else {
        return Ok(());
    };

    with_session(cfg, |ctx| {
        let index = number
            .checked_sub(1)
            .filter(|i| *i < ctx.session.trainees.len())
            .ok_or(AppError::InvalidTrainee(*number))?;

        if ctx.session.has_unsaved_view_changes()
            && !*force
            && !ask_confirmation("There are unsaved program changes that will be lost. Switch anyway?")
        {
            info("Switch cancelled; unsaved changes kept");
            return Ok(());
        }

        let programs = programs_for(ctx.store.as_mut(), &ctx.session, index)?;
        ctx.session.switch_to(index, programs)?;
        if let Some(t) = ctx.session.current_trainee() {
            success(format!("Now showing {}. {}", index + 1, t.name));
        }
        Ok(())
    })
}
