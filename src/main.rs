mod audio;
mod cli;
mod config;
mod db;
mod models;
mod prayer_times;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Times { delays }) => handlers::handle_times(&conn, &config, &delays)?,
        Some(Commands::Sync { clear }) => handlers::handle_sync(&conn, &config, clear)?,
        Some(Commands::Status) => handlers::handle_status(&conn, &config)?,

        // No subcommand → launch the widget
        None => tui::app::run(conn, config)?,
    }

    Ok(())
}
