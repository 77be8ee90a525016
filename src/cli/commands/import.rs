use super::with_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::import_into;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Import { file } = cmd else {
        return Ok(());
    };

    with_session(cfg, |ctx| {
        let outcome = import_into(ctx.store.as_mut(), &mut ctx.session, file)?;
        let grid = &outcome.program.data;
        let note = if outcome.saved { "" } else { " (pending save)" };
        success(format!(
            "Imported '{}': {} row(s) × {} column(s){note}",
            outcome.program.title,
            grid.height(),
            grid.width()
        ));
        Ok(())
    })
}
