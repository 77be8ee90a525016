//! MyFit library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::{BackendKind, Config};
use errors::AppResult;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr; `MYFIT_LOG` takes a tracing filter directive.
fn init_tracing(verbose: bool) {
    let default = if verbose { "myfit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("MYFIT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Apply `--db`, `--api` and `--backend` on top of the configuration file.
/// A bare `--db` selects the embedded store, a bare `--api` the REST API.
pub fn apply_overrides(cli: &Cli, cfg: &mut Config) {
    if let Some(db) = &cli.db {
        cfg.database = db.clone();
        cfg.backend = BackendKind::Embedded;
    }
    if let Some(api) = &cli.api {
        cfg.api_base = api.clone();
        cfg.backend = BackendKind::Rest;
    }
    if let Some(backend) = cli.backend {
        cfg.backend = backend;
    }
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cfg),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Show => commands::show::handle(cfg),
        Commands::Trainee { .. } => commands::trainee::handle(&cli.command, cfg),
        Commands::Switch { .. } => commands::switch::handle(&cli.command, cfg),
        Commands::Program { .. } => commands::program::handle(&cli.command, cfg),
        Commands::Cell { .. } | Commands::Row { .. } | Commands::Col { .. } => {
            commands::edit::handle(&cli.command, cfg)
        }
        Commands::Import { .. } => commands::import::handle(&cli.command, cfg),
        Commands::History { .. } => commands::history::handle(&cli.command, cfg),
        Commands::Status => commands::status::handle(cfg),
        Commands::Save => commands::save::handle_save(cfg),
        Commands::Discard { .. } => commands::save::handle_discard(&cli.command, cfg),
        Commands::Prefs { .. } => commands::prefs::handle(&cli.command),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // configuration is loaded once, then overridden from the command line
    let mut cfg = Config::load()?;
    apply_overrides(&cli, &mut cfg);
    tracing::debug!(?cfg, "configuration resolved");

    dispatch(&cli, &cfg)
}
