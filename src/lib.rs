//! dutyroster library root.
//! Exposes the assignment engine, its SQLite store and the CLI dispatcher.

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
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    use crate::cli::commands;

    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Person { .. } => commands::person::handle(&cli.command, cfg),
        Commands::Queue { .. } => commands::queue::handle(&cli.command, cfg),
        Commands::OffDuty { .. } => commands::off_duty::handle(&cli.command, cfg),
        Commands::Ensure { .. } => commands::ensure::handle(&cli.command, cfg),
        Commands::Complete { .. } => commands::complete::handle(&cli.command, cfg),
        Commands::Assign { .. } => commands::assign::handle(&cli.command, cfg),
        Commands::Claim { .. } => commands::claim::handle(&cli.command, cfg),
        Commands::Schedule { .. } => commands::schedule::handle(&cli.command, cfg),
        Commands::Forecast { .. } => commands::forecast::handle(&cli.command, cfg),
        Commands::Stats { .. } => commands::stats::handle(&cli.command, cfg),
        Commands::Trigger => commands::trigger::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once
    let mut cfg = Config::load()?;

    // command-line overrides
    if let Some(custom_db) = &cli.db {
        cfg.database = utils::path::expand_tilde(custom_db)
            .to_string_lossy()
            .to_string();
    }
    if let Some(today) = &cli.today {
        cfg.today = Some(utils::date::require_date(today)?);
    }

    dispatch(&cli, &cfg)
}
