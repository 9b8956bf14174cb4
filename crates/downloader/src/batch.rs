use std::mem::replace;

use slog::{error, info, Logger};
use time::Date;

use crate::{AmedasError, DataType, ObservationWriter, OutputFormat, SaveOutcome, Station};

/// Days from the first date up to, but not including, the second.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub Date, pub Date);

impl Iterator for DateRange {
    type Item = Date;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 < self.1 {
            let next = self.0.next_day()?;
            Some(replace(&mut self.0, next))
        } else {
            None
        }
    }
}

/// What to do when one download in a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failure and hand it back.
    #[default]
    FailFast,
    /// Log the failure, remember it and move on to the next download.
    KeepGoing,
}

#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub stations: Vec<Station>,
    pub data_types: Vec<DataType>,
    pub dates: DateRange,
    pub format: OutputFormat,
}

impl DownloadPlan {
    pub fn unit_count(&self) -> usize {
        self.dates.count() * self.stations.len() * self.data_types.len()
    }
}

#[derive(Debug)]
pub struct FailedDownload {
    pub oid: String,
    pub data_type: DataType,
    pub date: Date,
    pub error: AmedasError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<std::path::PathBuf>,
    pub skipped: usize,
    pub failed: Vec<FailedDownload>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Walks the plan date by date, then station, then data type, one download
/// at a time.
pub async fn run_batch(
    plan: &DownloadPlan,
    writer: &ObservationWriter,
    policy: ErrorPolicy,
    logger: &Logger,
) -> Result<BatchReport, AmedasError> {
    let mut report = BatchReport::default();
    info!(logger, "starting batch of {} downloads", plan.unit_count());

    for date in plan.dates {
        for station in &plan.stations {
            for &data_type in &plan.data_types {
                match writer.save(plan.format, station, data_type, date).await {
                    Ok(SaveOutcome::Written(path)) => report.written.push(path),
                    Ok(SaveOutcome::Skipped) => report.skipped += 1,
                    Err(err) if policy == ErrorPolicy::KeepGoing => {
                        error!(
                            logger,
                            "{} {} {}: {}", station.oid, data_type, date, err
                        );
                        report.failed.push(FailedDownload {
                            oid: station.oid.clone(),
                            data_type,
                            date,
                            error: err,
                        });
                    }
                    Err(err) => return Err(err),
                }
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_date_range_excludes_end() {
        let dates: Vec<Date> = DateRange(date!(2023 - 02 - 27), date!(2023 - 03 - 02)).collect();
        assert_eq!(
            dates,
            vec![date!(2023 - 02 - 27), date!(2023 - 02 - 28), date!(2023 - 03 - 01)]
        );
    }

    #[test]
    fn test_date_range_empty() {
        assert_eq!(DateRange(date!(2023 - 06 - 01), date!(2023 - 06 - 01)).count(), 0);
        assert_eq!(DateRange(date!(2023 - 06 - 02), date!(2023 - 06 - 01)).count(), 0);
    }

    #[test]
    fn test_unit_count() {
        let plan = DownloadPlan {
            stations: vec![],
            data_types: vec![DataType::Hour, DataType::Day],
            dates: DateRange(date!(2023 - 06 - 01), date!(2023 - 06 - 04)),
            format: OutputFormat::Csv,
        };
        assert_eq!(plan.unit_count(), 0);
        assert_eq!(plan.dates.count(), 3);
    }
}
