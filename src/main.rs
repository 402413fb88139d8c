mod config;
mod dashboard;
mod db;
mod error;
mod logging;
mod models;
mod run;
mod store;
mod transfer;
mod ui;
mod validate;
mod view;

use anyhow::{Context, Result};
use clap::Parser;

fn main() -> Result<()> {
    let cli = config::Cli::parse();
    let config = config::AppConfig::resolve(&cli)?;
    config.ensure_data_dir()?;
    logging::init(&config)?;

    let db = db::Database::open(&config.db_path)?;
    let mut tracker = store::Tracker::load(db).context("Failed to load saved records")?;

    match cli.command {
        None => run::as_tui(&mut tracker),
        Some(command) => run::as_cli(command, &mut tracker),
    }
}
