//! Grid edits: `cell`, `row` and `col`.

use super::{block_index, with_session};
use crate::cli::parser::{ColCmd, Commands, RowCmd};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    with_session(cfg, |ctx| {
        let session = &mut ctx.session;
        match cmd {
            Commands::Cell {
                block,
                row,
                col,
                value,
            } => {
                if session.update_cell(block_index(*block)?, *row, *col, value)? {
                    success(format!("Block #{block} [{row}, {col}] = \"{value}\""));
                } else {
                    info("Value unchanged");
                }
            }
            Commands::Row {
                action: RowCmd::Add { block },
            } => {
                session.add_row(block_index(*block)?)?;
                success(format!("Row added to block #{block}"));
            }
            Commands::Row {
                action: RowCmd::Delete { block, row },
            } => {
                session.delete_row(block_index(*block)?, *row)?;
                success(format!("Row {row} deleted from block #{block}"));
            }
            Commands::Col {
                action: ColCmd::Add { block },
            } => {
                session.add_column(block_index(*block)?)?;
                success(format!("Column added to block #{block}"));
            }
            _ => {}
        }
        Ok(())
    })
}
