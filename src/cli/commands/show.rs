use super::with_session;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::render::render_session;

/// Handle the `show` command: the current trainee's tab.
pub fn handle(cfg: &Config) -> AppResult<()> {
    with_session(cfg, |ctx| {
        print!("{}", render_session(&ctx.session, &ctx.prefs));
        Ok(())
    })
}
