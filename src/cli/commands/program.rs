use super::{block_index, with_session};
use crate::cli::parser::{Commands, ProgramCmd};
use crate::config::Config;
use crate::core::grid::Direction;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::ask_confirmation;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Program { action } = cmd else {
        return Ok(());
    };

    with_session(cfg, |ctx| {
        let session = &mut ctx.session;
        match action {
            ProgramCmd::Add { title } => {
                session.add_program(title)?;
                success(format!(
                    "Program '{title}' added as block #{} (pending save)",
                    session.programs.len()
                ));
            }
            ProgramCmd::Delete { block, force } => {
                let idx = block_index(*block)?;
                let title = session.block(idx)?.title.clone();
                if !*force && !ask_confirmation(&format!("Delete program '{title}'?")) {
                    info("Deletion cancelled");
                    return Ok(());
                }
                session.delete_program(idx)?;
                success(format!("Program '{title}' deleted (pending save)"));
            }
            ProgramCmd::Rename { block, title } => {
                if session.rename_program(block_index(*block)?, title)? {
                    success(format!("Block #{block} renamed to '{title}'"));
                } else {
                    info("Title unchanged");
                }
            }
            ProgramCmd::Move { block, direction } => {
                if session.move_block(block_index(*block)?, *direction)? {
                    success(format!("Block #{block} moved {direction:?}"));
                } else {
                    let edge = match direction {
                        Direction::Up => "first",
                        Direction::Down => "last",
                    };
                    warning(format!("Block #{block} is already the {edge} one"));
                }
            }
        }
        Ok(())
    })
}
