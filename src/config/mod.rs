pub mod file;

use crate::domain::model::Provider;
use crate::providers::ProviderSettings;
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

pub use file::FileConfig;

pub const DEFAULT_CSV: &str = "restaurants.csv";
pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Parser)]
#[command(name = "table-scout")]
#[command(about = "Check table availability across restaurant booking providers")]
pub struct CliConfig {
    /// Restaurant name or provider id to check.
    #[arg(long)]
    pub restaurant: Option<String>,

    /// Date to check, YYYYMMDD.
    #[arg(long)]
    pub date: Option<String>,

    /// Time to check, HHMM 24-hour. Repeatable.
    #[arg(long = "time")]
    pub times: Vec<String>,

    /// Party size.
    #[arg(long, default_value_t = 2)]
    pub people: u32,

    /// Check every restaurant in the directory.
    #[arg(long)]
    pub batch: bool,

    /// Concurrent provider queries in batch mode.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Restrict lookups and batch runs to one provider (ontopo or tabit).
    #[arg(long)]
    pub provider: Option<String>,

    /// Restaurant directory CSV.
    #[arg(long, default_value = DEFAULT_CSV)]
    pub csv: String,

    /// Emit machine-readable JSON instead of the human report.
    #[arg(long)]
    pub raw: bool,

    /// List the restaurant directory and exit.
    #[arg(long)]
    pub list: bool,

    /// Optional TOML config file.
    #[arg(long)]
    pub config: Option<String>,

    /// Per-query timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Enable verbose output.
    #[arg(long)]
    pub verbose: bool,
}

/// Runtime settings after merging CLI flags with the optional config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub csv_path: String,
    pub workers: usize,
    pub providers: ProviderSettings,
}

impl CliConfig {
    pub fn provider_filter(&self) -> Result<Option<Provider>> {
        match &self.provider {
            None => Ok(None),
            Some(value) => Provider::parse(value).map(Some).ok_or_else(|| {
                CheckError::config(format!(
                    "Unknown provider '{}' (expected ontopo or tabit)",
                    value
                ))
            }),
        }
    }

    /// Merge the optional config file: explicit CLI flags win, file values
    /// beat built-in defaults.
    pub fn resolved(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        file.validate()?;

        let csv_path = if self.csv != DEFAULT_CSV {
            self.csv.clone()
        } else {
            file.csv_path().unwrap_or(DEFAULT_CSV).to_string()
        };
        let workers = if self.workers != DEFAULT_WORKERS {
            self.workers
        } else {
            file.workers().unwrap_or(DEFAULT_WORKERS)
        };
        let timeout_secs = if self.timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.timeout_secs
        } else {
            file.timeout_secs().unwrap_or(DEFAULT_TIMEOUT_SECS)
        };

        let mut providers = ProviderSettings::default();
        providers.timeout = Duration::from_secs(timeout_secs);
        if let Some(url) = file.ontopo_base_url() {
            providers.ontopo_base_url = url.to_string();
        }
        if let Some(url) = file.tabit_base_url() {
            providers.tabit_base_url = url.to_string();
        }

        Ok(Settings {
            csv_path,
            workers,
            providers,
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        // Format checks come first so bad input is reported even when the
        // mode flags are incomplete.
        if let Some(date) = &self.date {
            validation::validate_date(date)?;
        }
        for time in &self.times {
            validation::validate_time(time)?;
        }
        validation::validate_party_size(self.people)?;
        validation::validate_worker_count(self.workers)?;
        self.provider_filter()?;

        if self.list {
            return Ok(());
        }
        if !self.batch && self.restaurant.is_none() {
            return Err(CheckError::config(
                "Specify --restaurant <name|id>, --batch, or --list",
            ));
        }
        if self.date.is_none() {
            return Err(CheckError::config("--date is required (YYYYMMDD)"));
        }
        if self.times.is_empty() {
            return Err(CheckError::config("At least one --time is required (HHMM)"));
        }
        Ok(())
    }
}
