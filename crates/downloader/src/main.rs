use amedasdl::{
    get_config_info, load_registry, parse_date, run_batch, setup_logger, split_list, BatchReport,
    Cli, DataType, DateRange, DownloadPlan, ErrorPolicy, HtmlFetcher, ObservationWriter,
    PageSource, RegistryUpdater, RequestThrottle, Station, StationRegistry, DEFAULT_SELECT_URL,
};
use anyhow::anyhow;
use slog::{info, warn, Logger};
use std::{io::Write, path::Path, sync::Arc};
use time::Date;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = get_config_info();
    let logger = setup_logger(&cli);

    let throttle = RequestThrottle::from_secs_f64(cli.request_interval())?;
    let fetcher: Arc<dyn PageSource> = Arc::new(HtmlFetcher::new(logger.clone(), throttle));

    if let Some(path) = cli.update_registry.as_ref() {
        let updater = RegistryUpdater::new(logger.clone(), fetcher, DEFAULT_SELECT_URL)?;
        updater.update(Path::new(path)).await?;
        return Ok(());
    }

    let registry = load_registry(&cli)?;
    info!(logger, "loaded {} stations", registry.len());

    if cli.list {
        for station in registry.list() {
            println!("{}", station);
        }
        return Ok(());
    }

    if let Some(query) = cli.search.as_ref() {
        print_search(&registry, query, &logger);
        return Ok(());
    }

    let mut prompt = Prompt::new();
    let mut stations: Vec<Station> = Vec::new();

    if let Some(query) = cli.isearch.as_ref() {
        match interactive_search(&registry, query, &mut prompt, &logger).await? {
            Some(station) => stations.push(station),
            None => return Ok(()),
        }
    }
    stations.extend(select_stations(&registry, &cli, &logger));

    if cli.detail {
        for station in &stations {
            println!("{}\n", station.detail());
        }
        return Ok(());
    }

    let data_types = select_data_types(&cli, &logger);
    if stations.is_empty() || data_types.is_empty() {
        warn!(logger, "nothing to download: no station or data type selected");
        return Ok(());
    }

    let start = read_date(cli.start.as_deref(), "StartDate(YYYYMMDD): ", &mut prompt).await?;
    let end = read_date(cli.end.as_deref(), "EndDate(YYYYMMDD)  : ", &mut prompt).await?;

    let plan = DownloadPlan {
        stations,
        data_types,
        dates: DateRange(start, end),
        format: cli.output,
    };
    let policy = if cli.keep_going {
        ErrorPolicy::KeepGoing
    } else {
        ErrorPolicy::FailFast
    };
    let writer = ObservationWriter::new(fetcher, cli.data_dir(), cli.base_url(), logger.clone());

    let report = run_batch(&plan, &writer, policy, &logger).await?;
    log_summary(&report, &logger);
    if !report.is_clean() {
        return Err(anyhow!("{} downloads failed", report.failed.len()));
    }
    Ok(())
}

#[cfg(feature = "fuzzy")]
fn print_search(registry: &StationRegistry, query: &str, _logger: &Logger) {
    for candidate in registry.fuzzy_candidates(query) {
        println!("ID:{}    {}", candidate.oid, candidate.label);
    }
}

#[cfg(not(feature = "fuzzy"))]
fn print_search(registry: &StationRegistry, query: &str, logger: &Logger) {
    info!(
        logger,
        "searching exact names only, build with the `fuzzy` feature for fuzzy search"
    );
    match registry.find_by_name(query) {
        Some(station) => println!("{}", station),
        None => println!("None"),
    }
}

/// Narrows the query with more input until a single station is left, then
/// asks for confirmation.
#[cfg(feature = "fuzzy")]
async fn interactive_search(
    registry: &StationRegistry,
    query: &str,
    prompt: &mut Prompt,
    logger: &Logger,
) -> Result<Option<Station>, anyhow::Error> {
    let mut keyword = query.to_string();
    let target = loop {
        let candidates = registry.fuzzy_candidates(&keyword);
        for candidate in &candidates {
            println!("ID:{}    {}", candidate.oid, candidate.label);
        }
        match candidates.as_slice() {
            [] => {
                warn!(logger, "no station matches '{}'", keyword);
                return Ok(None);
            }
            [only] => break only.oid.clone(),
            _ => match prompt.ask(&format!("> {}", keyword)).await? {
                Some(more) => keyword.push_str(more.trim()),
                None => return Ok(None),
            },
        }
    };

    let answer = prompt.ask("Download This Location Data? y/n  ").await?;
    if answer.as_deref().map(str::trim) != Some("y") {
        return Ok(None);
    }
    Ok(registry.find_by_id(&target).cloned())
}

#[cfg(not(feature = "fuzzy"))]
async fn interactive_search(
    _registry: &StationRegistry,
    _query: &str,
    _prompt: &mut Prompt,
    _logger: &Logger,
) -> Result<Option<Station>, anyhow::Error> {
    Err(anyhow!(
        "interactive search needs the `fuzzy` feature, rebuild with it enabled"
    ))
}

fn select_stations(registry: &StationRegistry, cli: &Cli, logger: &Logger) -> Vec<Station> {
    let mut stations = Vec::new();
    for name in split_list(cli.name.as_deref().unwrap_or_default()) {
        match registry.find_by_name(&name) {
            Some(station) => stations.push(station.clone()),
            None => warn!(logger, "Not Found Name {}", name),
        }
    }
    for oid in split_list(cli.oid.as_deref().unwrap_or_default()) {
        match registry.find_by_id(&oid) {
            Some(station) => stations.push(station.clone()),
            None => warn!(logger, "Not Found ID:{}", oid),
        }
    }
    stations
}

fn select_data_types(cli: &Cli, logger: &Logger) -> Vec<DataType> {
    cli.data_types()
        .iter()
        .filter_map(|token| match token.parse::<DataType>() {
            Ok(data_type) => Some(data_type),
            Err(err) => {
                warn!(logger, "{}, skipping", err);
                None
            }
        })
        .collect()
}

async fn read_date(
    given: Option<&str>,
    question: &str,
    prompt: &mut Prompt,
) -> Result<Date, anyhow::Error> {
    let input = match given {
        Some(value) => value.to_string(),
        None => prompt
            .ask(question)
            .await?
            .ok_or_else(|| anyhow!("no date given"))?,
    };
    Ok(parse_date(&input)?)
}

fn log_summary(report: &BatchReport, logger: &Logger) {
    info!(
        logger,
        "finished: {} written, {} skipped, {} failed",
        report.written.len(),
        report.skipped,
        report.failed.len()
    );
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Prompt {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// None once stdin is closed.
    async fn ask(&mut self, question: &str) -> Result<Option<String>, anyhow::Error> {
        print!("{}", question);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}
