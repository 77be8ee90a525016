use super::with_session;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::RecordStoreExt;
use crate::ui::render::{render_history, render_tabs};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::History { trainee } = cmd else {
        return Ok(());
    };

    with_session(cfg, |ctx| {
        let current = ctx.session.current_trainee().map(|t| t.id.clone());
        let mut entries = match (&current, *trainee) {
            (Some(id), true) if id.is_durable() => ctx.store.history(Some(id))?,
            (_, true) => Vec::new(),
            (_, false) => ctx.store.history(None)?,
        };
        // Still queued (their trainee is not saved yet), so newer than anything stored.
        entries.extend(
            ctx.session
                .journal
                .iter()
                .filter(|h| !*trainee || Some(&h.trainee_id) == current.as_ref())
                .cloned(),
        );

        ctx.session.show_history();
        println!("{}\n", render_tabs(&ctx.session, ctx.prefs.theme));
        print!("{}", render_history(&entries, ctx.prefs.theme));
        Ok(())
    })
}
