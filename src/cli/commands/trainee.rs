use super::with_session;
use crate::cli::parser::{Commands, TraineeCmd};
use crate::config::Config;
use crate::core::sync::programs_for;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::ask_confirmation;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Trainee { action } = cmd else {
        return Ok(());
    };

    with_session(cfg, |ctx| {
        let session = &mut ctx.session;
        match action {
            TraineeCmd::List => {
                for (i, t) in session.trainees.iter().enumerate() {
                    let marker = if i == session.current { "*" } else { " " };
                    let unsaved = if t.id.is_temporary() { " (unsaved)" } else { "" };
                    println!("{marker} {}. {}{unsaved}", i + 1, t.name);
                }
            }
            TraineeCmd::Add { name } => {
                let index = session.add_trainee(name);
                success(format!(
                    "Trainee '{name}' added as #{} (run `myfit save` to store it)",
                    index + 1
                ));
            }
            TraineeCmd::Rename { name } => {
                if session.rename_trainee(name)? {
                    success(format!("Trainee renamed to '{name}'"));
                } else {
                    info("Name unchanged");
                }
            }
            TraineeCmd::Delete { force } => {
                let name = session
                    .current_trainee()
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                if !*force
                    && !ask_confirmation(&format!(
                        "Delete trainee '{name}' with all programs and history?"
                    ))
                {
                    info("Deletion cancelled");
                    return Ok(());
                }

                session.delete_trainee()?;
                let programs = programs_for(ctx.store.as_mut(), session, 0)?;
                session.switch_to(0, programs)?;
                success(format!(
                    "Trainee '{name}' deleted (run `myfit save` to apply)"
                ));
            }
        }
        Ok(())
    })
}
