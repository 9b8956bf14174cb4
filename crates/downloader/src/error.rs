use std::path::PathBuf;

use time::PrimitiveDateTime;

#[derive(thiserror::Error, Debug)]
pub enum AmedasError {
    #[error("data for {date} is not published yet (must be before {threshold})")]
    InvalidDate {
        date: PrimitiveDateTime,
        threshold: PrimitiveDateTime,
    },
    #[error("station {0} is not registered in the station list yet")]
    UnregisteredStation(String),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("table '{table_id}' (index {index}) not found in page")]
    TableNotFound { table_id: String, index: usize },
    #[error("invalid css selector: {0}")]
    Selector(String),
    #[error("failed to parse station list: {0}")]
    RegistryLoad(#[from] serde_json::Error),
    #[error("malformed station record '{oid}': {source}")]
    RegistryRecord {
        oid: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("station list key '{key}' does not match record oid '{oid}'")]
    RegistryKeyMismatch { key: String, oid: String },
    #[error("failed to write csv {0}: {1}")]
    Csv(PathBuf, #[source] csv::Error),
    #[error("io error on {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("unreadable station entry on {page}: {reason}")]
    StationArea { page: String, reason: String },
    #[error("failed to format date: {0}")]
    DateFormat(#[from] time::error::Format),
    #[error("invalid request interval {0}s")]
    InvalidInterval(f64),
    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid date '{0}', expected YYYYMMDD")]
    DateParse(String),
}
