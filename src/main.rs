mod cli;
mod config;
mod db;
mod error;
mod models;
mod store;
mod tui;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::MetaRepo;
use models::TrackerCategory;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        return handlers::handle_init();
    }

    let config = AppConfig::load().context("Loading config")?;

    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;
    stamp_first_run(&conn)?;

    match cli.command {
        Some(Commands::Prayer { action }) => {
            handlers::handle_tracker(&conn, &config, TrackerCategory::Prayers, &action)?;
        }
        Some(Commands::Fast { action }) => {
            handlers::handle_tracker(&conn, &config, TrackerCategory::Fasts, &action)?;
        }
        Some(Commands::History {
            fasts,
            limit,
            hijri,
        }) => {
            handlers::handle_history(&conn, &config, fasts, limit, hijri)?;
        }
        Some(Commands::Ledger { kind, action }) => {
            handlers::handle_ledger(&conn, &config, &kind, &action)?;
        }
        Some(Commands::Zakat { action }) => {
            handlers::handle_zakat(&conn, &config, &action)?;
        }
        Some(Commands::Savings { goal, action }) => {
            handlers::handle_savings(&conn, &config, &goal, &action)?;
        }
        Some(Commands::Summary) => {
            handlers::handle_summary(&conn, &config)?;
        }
        Some(Commands::Export) => {
            handlers::handle_export(&conn)?;
        }
        Some(Commands::Init) => unreachable!(),

        // No subcommand → launch TUI
        None => {
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

fn stamp_first_run(conn: &Connection) -> Result<()> {
    if MetaRepo::get(conn, "first_run")?.is_none() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        MetaRepo::set(conn, "first_run", &today)?;
    }
    Ok(())
}
