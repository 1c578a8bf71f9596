//! garageledger library root.
//! Exposes the CLI parser, the high-level run() function and the domain
//! modules (ledger, aggregation, customer registry, follow-up scheduler,
//! role projection).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Add { .. } => commands::add::handle(&cli.command, cfg),
        Commands::Del { .. } => commands::del::handle(&cli.command, cfg),
        Commands::List { .. } => commands::list::handle(&cli.command, cfg),
        Commands::Summary { .. } => commands::summary::handle(&cli.command, cfg),
        Commands::Customer { .. } => commands::customer::handle(&cli.command, cfg),
        Commands::Followup { .. } => commands::followup::handle(&cli.command, cfg),
        Commands::Marketing { .. } => commands::marketing::handle(&cli.command, cfg),
        Commands::Employee { .. } => commands::employee::handle(&cli.command, cfg),
        Commands::Bill { .. } => commands::bill::handle(&cli.command, cfg),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Import { .. } => commands::import::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Config is loaded once, then overridden from the command line.
    let mut cfg = Config::load();

    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }
    if let Some(role) = cli.role {
        cfg.role = role;
    }

    dispatch(&cli, &cfg)
}
