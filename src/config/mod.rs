use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::models::Currency;
use crate::view::SortField;

const DB_FILE: &str = "fintrack.db";
const LOG_FILE: &str = "fintrack.log";

#[derive(Debug, Parser)]
#[command(
    name = "fintrack",
    version,
    about = "FinTrack - local-only spending tracker with a spending cap",
    long_about = "FinTrack - local-only spending tracker with a spending cap.\n\n\
                  Run without a command to launch the interactive TUI."
)]
pub(crate) struct Cli {
    /// Directory holding the database and log file.
    #[arg(long, global = true, env = "FINTRACK_DATA_DIR")]
    pub(crate) data_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `fintrack=debug`.
    #[arg(long, global = true, env = "FINTRACK_LOG", default_value = "info")]
    pub(crate) log_level: String,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Add a record
    Add {
        #[arg(long)]
        description: String,
        /// Amount in the base currency (RWF)
        #[arg(long)]
        amount: String,
        #[arg(long)]
        category: String,
        /// YYYY-MM-DD, default today
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a record; unspecified fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a record
    Delete { id: String },
    /// List records
    List {
        /// Regular expression matched against description, category, amount and date
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        case_sensitive: bool,
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Reverse the default direction of --sort
        #[arg(long, requires = "sort")]
        reverse: bool,
    },
    /// Print totals, top category and cap status
    Summary,
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Replace all records with the contents of a JSON file
    Import { path: PathBuf },
    /// Write all records to a JSON file (default ~/fintrack-records.json)
    Export { path: Option<String> },
}

#[derive(Debug, Subcommand)]
pub(crate) enum SettingsAction {
    Show,
    Set {
        /// Spending cap in the base currency; 0 removes the cap
        #[arg(long)]
        cap: Option<String>,
        /// Display currency: RWF, USD or EUR
        #[arg(long)]
        currency: Option<String>,
        /// Rate override, e.g. --rate USD=0.00095 (repeatable)
        #[arg(long = "rate", value_parser = parse_rate)]
        rates: Vec<(Currency, String)>,
    },
    /// Restore default cap, currency and rates
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortKey {
    Date,
    Description,
    Amount,
}

impl From<SortKey> for SortField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => SortField::Date,
            SortKey::Description => SortField::Description,
            SortKey::Amount => SortField::Amount,
        }
    }
}

fn parse_rate(s: &str) -> std::result::Result<(Currency, String), String> {
    let (code, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=VALUE, got '{s}'"))?;
    let currency =
        Currency::parse(code).ok_or_else(|| format!("unsupported currency '{}'", code.trim()))?;
    Ok((currency, value.trim().to_string()))
}

/// Resolved runtime paths and options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AppConfig {
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_level: String,
}

impl AppConfig {
    pub(crate) fn resolve(cli: &Cli) -> Result<Self> {
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };
        Ok(Self::in_dir(&data_dir, &cli.log_level))
    }

    pub(crate) fn in_dir(data_dir: &Path, log_level: &str) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join(DB_FILE),
            log_path: data_dir.join(LOG_FILE),
            log_level: log_level.to_string(),
        }
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                self.data_dir.display()
            )
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "fintrack", "FinTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
