use crate::config::{BackendKind, Theme, ViewMode};
use crate::core::grid::Direction;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for MyFit
/// Trainer tool to keep workout programs and their edit history
#[derive(Parser)]
#[command(
    name = "myfit",
    version = env!("CARGO_PKG_VERSION"),
    about = "A fitness trainer CLI: trainees, workout program grids and an audit history",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the configured backend
    #[arg(global = true, long = "backend", value_enum)]
    pub backend: Option<BackendKind>,

    /// Override the REST API base URL
    #[arg(global = true, long = "api", value_name = "URL")]
    pub api: Option<String>,

    /// Print diagnostic output on stderr
    #[arg(global = true, short = 'v', long = "verbose")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the configuration, create or migrate the store and seed it
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Show the current trainee and their programs
    Show,

    /// Manage the roster
    Trainee {
        #[command(subcommand)]
        action: TraineeCmd,
    },

    /// Switch to trainee N (as numbered by `trainee list`)
    Switch {
        number: usize,
        #[arg(long, short = 'f', help = "Drop unsaved program changes without asking")]
        force: bool,
    },

    /// Manage the current trainee's program blocks
    Program {
        #[command(subcommand)]
        action: ProgramCmd,
    },

    /// Set one cell: block number, row (0 = header), column (from 0) and value
    Cell {
        block: usize,
        row: usize,
        col: usize,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Add or delete grid rows
    Row {
        #[command(subcommand)]
        action: RowCmd,
    },

    /// Add grid columns
    Col {
        #[command(subcommand)]
        action: ColCmd,
    },

    /// Import a .csv, .txt, .xlsx or .docx file as a new block
    Import { file: PathBuf },

    /// Print the audit history, newest first
    History {
        #[arg(long = "trainee", help = "Only entries of the current trainee")]
        trainee: bool,
    },

    /// List pending (unsaved) changes
    Status,

    /// Write pending changes to the backend
    Save,

    /// Drop pending changes
    Discard {
        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },

    /// View and change display preferences
    Prefs {
        #[arg(long, value_enum)]
        theme: Option<Theme>,

        #[arg(long, value_enum)]
        view: Option<ViewMode>,

        #[arg(long = "toggle-theme", conflicts_with = "theme")]
        toggle_theme: bool,

        #[arg(long = "toggle-view", conflicts_with = "view")]
        toggle_view: bool,
    },
}

#[derive(Subcommand)]
pub enum TraineeCmd {
    /// List trainees
    List,
    /// Add a trainee (saved with `myfit save`)
    Add { name: String },
    /// Rename the current trainee
    Rename { name: String },
    /// Delete the current trainee with all programs and history
    Delete {
        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ProgramCmd {
    /// Add a block with the default grid
    Add { title: String },
    /// Delete block N
    Delete {
        block: usize,
        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },
    /// Rename block N
    Rename { block: usize, title: String },
    /// Move block N one place up or down
    Move {
        block: usize,
        #[arg(value_enum)]
        direction: Direction,
    },
}

#[derive(Subcommand)]
pub enum RowCmd {
    /// Append a blank row to block N
    Add { block: usize },
    /// Delete a row (not the header) of block N
    Delete { block: usize, row: usize },
}

#[derive(Subcommand)]
pub enum ColCmd {
    /// Append a column to block N
    Add { block: usize },
}
