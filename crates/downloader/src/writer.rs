use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use amedas_core::create_dir_all;
use clap::ValueEnum;
use slog::{info, Logger};
use time::{macros::format_description, Date, PrimitiveDateTime};

use crate::{
    build_url, extract_table, local_now, resolve_schema, AmedasError, DataType, Grid, PageSource,
    SchemaSupport, Station,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Html,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// Nothing fetched or written; the reason has been logged.
    Skipped,
}

/// Fetches pages for a station and stores them under
/// `<root>/<block_no>_<group_name>_<name>/<YYYY>/<MM>/`.
pub struct ObservationWriter {
    source: Arc<dyn PageSource>,
    root: PathBuf,
    base_url: String,
    logger: Logger,
    clock: fn() -> PrimitiveDateTime,
}

impl ObservationWriter {
    pub fn new(
        source: Arc<dyn PageSource>,
        root: impl Into<PathBuf>,
        base_url: impl Into<String>,
        logger: Logger,
    ) -> Self {
        ObservationWriter {
            source,
            root: root.into(),
            base_url: base_url.into(),
            logger,
            clock: local_now,
        }
    }

    /// Replaces the clock used to decide which dates are already published.
    pub fn with_clock(mut self, clock: fn() -> PrimitiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn station_dir(&self, station: &Station, date: Date) -> PathBuf {
        self.root
            .join(format!(
                "{}_{}_{}",
                station.block_no, station.group_name, station.name
            ))
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", u8::from(date.month())))
    }

    pub fn file_path(
        &self,
        station: &Station,
        data_type: DataType,
        date: Date,
        format: OutputFormat,
    ) -> Result<PathBuf, AmedasError> {
        let stamp = date.format(format_description!("[year][month][day]"))?;
        Ok(self.station_dir(station, date).join(format!(
            "{}_{}_{}.{}",
            stamp,
            station.block_no,
            data_type.name(),
            format.extension()
        )))
    }

    async fn download(
        &self,
        station: &Station,
        data_type: DataType,
        date: Date,
    ) -> Result<String, AmedasError> {
        let url = build_url(
            &self.base_url,
            station,
            data_type,
            date.midnight(),
            (self.clock)(),
        )?;
        info!(self.logger, "download url: {}", url);
        self.source.fetch(&url).await
    }

    pub async fn save(
        &self,
        format: OutputFormat,
        station: &Station,
        data_type: DataType,
        date: Date,
    ) -> Result<SaveOutcome, AmedasError> {
        match format {
            OutputFormat::Csv => self.save_csv(station, data_type, date).await,
            OutputFormat::Html => self.save_html(station, data_type, date).await,
        }
    }

    /// Stores the page exactly as it was received.
    pub async fn save_html(
        &self,
        station: &Station,
        data_type: DataType,
        date: Date,
    ) -> Result<SaveOutcome, AmedasError> {
        let html = self.download(station, data_type, date).await?;
        let path = self.file_path(station, data_type, date, OutputFormat::Html)?;
        prepare_parent(&path)?;
        fs::write(&path, html).map_err(|e| AmedasError::Io(path.clone(), e))?;
        info!(self.logger, "saved {}", path.display());
        Ok(SaveOutcome::Written(path))
    }

    /// Extracts the data table and stores it as CSV with the schema's header
    /// row first (an empty row when the labels are not worked out yet).
    pub async fn save_csv(
        &self,
        station: &Station,
        data_type: DataType,
        date: Date,
    ) -> Result<SaveOutcome, AmedasError> {
        let schema = resolve_schema(data_type, station.network);
        match schema.support {
            SchemaSupport::Unsupported => {
                info!(self.logger, "{} is not supported for csv output", data_type);
                return Ok(SaveOutcome::Skipped);
            }
            SchemaSupport::HeadersPending => {
                info!(
                    self.logger,
                    "csv header for {} at {} stations is not implemented", data_type, station.network
                );
            }
            SchemaSupport::Complete => {}
        }

        let html = self.download(station, data_type, date).await?;
        let grid = extract_table(
            &html,
            schema.table_id,
            schema.header_rows,
            schema.table_index,
        )?;

        let path = self.file_path(station, data_type, date, OutputFormat::Csv)?;
        prepare_parent(&path)?;
        write_csv(&path, schema.headers, &grid)?;
        info!(
            self.logger,
            "saved {} ({} rows)",
            path.display(),
            grid.len()
        );
        Ok(SaveOutcome::Written(path))
    }
}

fn prepare_parent(path: &Path) -> Result<(), AmedasError> {
    match path.parent() {
        Some(dir) => create_dir_all(dir).map_err(|e| AmedasError::Io(dir.to_path_buf(), e)),
        None => Ok(()),
    }
}

fn write_csv(path: &Path, headers: &[&str], grid: &Grid) -> Result<(), AmedasError> {
    let csv_error = |e| AmedasError::Csv(path.to_path_buf(), e);
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    writer.write_record(headers).map_err(csv_error)?;
    for row in grid {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer
        .flush()
        .map_err(|e| AmedasError::Io(path.to_path_buf(), e))
}
