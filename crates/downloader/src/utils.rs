use amedas_core::{
    find_config_file, load_config, ConfigSource, DEFAULT_BASE_URL, DEFAULT_DATA_DIR,
    DEFAULT_REQUEST_INTERVAL,
};
use clap::{ArgGroup, Parser};
use slog::{o, Drain, Level, Logger};
use std::{env, path::PathBuf};
use time::{macros::format_description, Date};

use crate::{AmedasError, OutputFormat, StationRegistry};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "AMeDAS Downloader - Saves historical JMA observation pages as csv or html",
    after_help = "Pages for the current day are never published, so dates must be before today."
)]
#[command(group(ArgGroup::new("location").args(["search", "isearch", "name", "oid"])))]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $AMEDASDL_CONFIG, ./amedasdl.toml,
    /// $XDG_CONFIG_HOME/amedasdl/amedasdl.toml, /etc/amedasdl/amedasdl.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "AMEDASDL_LEVEL")]
    pub level: Option<String>,

    /// Root directory downloaded files are written under
    #[arg(long, env = "AMEDASDL_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Station list (JSON) to use instead of the bundled one. The bundled list
    /// is a partial set of major stations; build the full list with
    /// --update-registry and point this at it
    #[arg(long, env = "AMEDASDL_REGISTRY")]
    pub registry: Option<String>,

    /// Base URL of the historical data viewer
    #[arg(long, env = "AMEDASDL_BASE_URL")]
    pub base_url: Option<String>,

    /// Pause before every request in seconds
    #[arg(long, env = "AMEDASDL_REQUEST_INTERVAL")]
    pub request_interval: Option<f64>,

    /// Print every known station and exit
    #[arg(short, long)]
    #[serde(skip)]
    pub list: bool,

    /// Search station names and exit
    #[arg(long, value_name = "QUERY")]
    #[serde(skip)]
    pub search: Option<String>,

    /// Narrow a search interactively until one station is left
    #[arg(long, value_name = "QUERY")]
    #[serde(skip)]
    pub isearch: Option<String>,

    /// Station names, comma separated
    #[arg(short, long)]
    #[serde(skip)]
    pub name: Option<String>,

    /// Station ids, comma separated
    #[arg(short = 'i', long)]
    #[serde(skip)]
    pub oid: Option<String>,

    /// Print the selected stations' details and exit
    #[arg(long)]
    #[serde(skip)]
    pub detail: bool,

    /// Data types, comma separated: Annual, ThreeMonth, AllMonth, YearMonth,
    /// TenDays, FiveDays, Day, Hour, TenMinutes
    #[arg(short = 't', long)]
    #[serde(skip)]
    pub dtype: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    #[serde(skip)]
    pub output: OutputFormat,

    /// First date to download, YYYYMMDD
    #[arg(short, long)]
    #[serde(skip)]
    pub start: Option<String>,

    /// Date to stop before, YYYYMMDD
    #[arg(short, long)]
    #[serde(skip)]
    pub end: Option<String>,

    /// Keep downloading after a failure and report every failure at the end
    #[arg(long)]
    #[serde(skip)]
    pub keep_going: bool,

    /// Rebuild the station list from the portal and write it to PATH
    #[arg(long, value_name = "PATH")]
    #[serde(skip)]
    pub update_registry: Option<String>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn data_dir(&self) -> String {
        self.data_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_interval(&self) -> f64 {
        self.request_interval.unwrap_or(DEFAULT_REQUEST_INTERVAL)
    }

    pub fn registry_path(&self) -> Option<PathBuf> {
        self.registry.as_ref().map(PathBuf::from)
    }

    pub fn data_types(&self) -> Vec<String> {
        split_list(self.dtype.as_deref().unwrap_or("TenMinutes"))
    }

    /// Config file values fill in whatever the command line (or env) left unset.
    pub fn with_file_config(self, file_config: Cli) -> Cli {
        Cli {
            level: self.level.or(file_config.level),
            data_dir: self.data_dir.or(file_config.data_dir),
            registry: self.registry.or(file_config.registry),
            base_url: self.base_url.or(file_config.base_url),
            request_interval: self.request_interval.or(file_config.request_interval),
            ..self
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    // Determine config file path
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("AMEDASDL_CONFIG", "amedasdl.toml")
    };

    let file_config: Cli = load_config(&source).unwrap_or_default();
    cli_args.with_file_config(file_config)
}

pub fn load_registry(cli: &Cli) -> Result<StationRegistry, AmedasError> {
    match cli.registry_path() {
        Some(path) => StationRegistry::from_path(&path),
        None => StationRegistry::bundled(),
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    // stdout is kept for listings and search results
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}

/// Parses a `YYYYMMDD` date.
pub fn parse_date(input: &str) -> Result<Date, AmedasError> {
    let input = input.trim();
    Date::parse(input, format_description!("[year][month][day]"))
        .map_err(|_| AmedasError::DateParse(input.to_string()))
}

/// Splits a comma separated option value, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
