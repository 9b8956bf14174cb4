//! AMeDAS Downloader Core Library
//!
//! Shared utilities for the downloader:
//! - Configuration loading (XDG-compliant)
//! - File system utilities
//! - Application defaults

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, ConfigSource};
pub use fs::create_dir_all;

/// Application name used for XDG paths
pub const APP_NAME: &str = "amedasdl";

/// Default output root for downloaded files
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default pause before every request to the data portal (seconds)
pub const DEFAULT_REQUEST_INTERVAL: f64 = 1.0;

/// Base endpoint of the JMA historical data viewer
pub const DEFAULT_BASE_URL: &str = "https://www.data.jma.go.jp/obd/stats/etrn/view/";
