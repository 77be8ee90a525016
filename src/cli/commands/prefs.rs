use crate::cli::parser::Commands;
use crate::config::Preferences;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Handle the `prefs` command. Works without touching the backend.
pub fn handle(cmd: &Commands) -> AppResult<()> {
    let Commands::Prefs {
        theme,
        view,
        toggle_theme,
        toggle_view,
    } = cmd
    else {
        return Ok(());
    };

    let mut prefs = Preferences::load()?;
    let before = prefs.clone();

    if let Some(t) = theme {
        prefs.theme = *t;
    }
    if *toggle_theme {
        prefs.theme = prefs.theme.toggled();
    }
    if let Some(v) = view {
        prefs.view_mode = *v;
    }
    if *toggle_view {
        prefs.view_mode = prefs.view_mode.toggled();
    }

    if prefs != before {
        prefs.save()?;
        success("Preferences saved");
    }
    println!("theme: {:?}", prefs.theme);
    println!("view : {:?}", prefs.view_mode);
    Ok(())
}
