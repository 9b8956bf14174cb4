//! Rebuilds the station list from the portal's station selection pages.
//!
//! The prefecture index carries an image map with one `<area>` per
//! prefecture/subprefecture group; each group page carries one `<area>` per
//! station whose `onmouseover` handler passes every station attribute to a
//! `viewPoint(...)` call.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use slog::{debug, info, Logger};

use crate::{AmedasError, DegreeMinute, NetworkType, PageSource, StationRecord};

pub const DEFAULT_SELECT_URL: &str = "https://www.data.jma.go.jp/obd/stats/etrn/select/";

const VIEW_POINT_PREFIX: &str = "javascript:viewPoint(";
const VIEW_POINT_ARGS: usize = 23;

/// Readings the portal prints without the small kana.
const YOMI_FIXES: [(&str, &str); 12] = [
    ("47401", "ワッカナイ"),
    ("47412", "サッポロ"),
    ("47421", "スッツ"),
    ("47433", "クッチャン"),
    ("47520", "シンジョウ"),
    ("47648", "チョウシ"),
    ("47662", "トウキョウ"),
    ("47678", "ハチジョウジマ"),
    ("47684", "ヨッカイチ"),
    ("47746", "トットリ"),
    ("47759", "キョウト"),
    ("47829", "ミヤコノジョウ"),
];

/// A prefecture or subprefecture group from the index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationGroup {
    pub prec_no: String,
    pub name: String,
}

/// Sensors an automatic station reports, from the `viewPoint` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorFlags {
    pub rain: bool,
    pub wind: bool,
    pub temperature: bool,
    pub sunshine: bool,
    pub snow: bool,
}

impl SensorFlags {
    pub fn network_type(&self) -> NetworkType {
        if !self.rain && self.snow {
            NetworkType::AutoSnow
        } else if self.temperature && self.wind && self.sunshine {
            NetworkType::Auto4
        } else if self.temperature && self.wind {
            NetworkType::Auto3
        } else {
            NetworkType::AutoRain
        }
    }
}

fn selector(css: &str) -> Result<Selector, AmedasError> {
    Selector::parse(css).map_err(|e| AmedasError::Selector(format!("'{}': {}", css, e)))
}

/// `area` elements of the first image map on the page.
fn map_areas(document: &Html) -> Result<Vec<ElementRef<'_>>, AmedasError> {
    let map_selector = selector("map")?;
    let area_selector = selector("area")?;
    Ok(document
        .select(&map_selector)
        .next()
        .map(|map| map.select(&area_selector).collect())
        .unwrap_or_default())
}

fn parse_url(url: &str) -> Result<Url, AmedasError> {
    Url::parse(url).map_err(|e| AmedasError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn join_url(base: &Url, href: &str) -> Result<Url, AmedasError> {
    base.join(href).map_err(|e| AmedasError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn is_group_link(url: &Url) -> bool {
    url.path().ends_with("/prefecture.php")
}

/// Groups in page order. `page` is the index page's own URL and resolves
/// relative links. A repeated `prec_no` keeps its first position and its
/// last label.
pub fn parse_group_index(page: &Url, html: &str) -> Result<Vec<StationGroup>, AmedasError> {
    let document = Html::parse_document(html);
    let mut groups: Vec<StationGroup> = Vec::new();
    for area in map_areas(&document)? {
        let Some(link) = area.value().attr("href").and_then(|href| page.join(href).ok()) else {
            continue;
        };
        if !is_group_link(&link) {
            continue;
        }
        let Some(prec_no) = query_value(&link, "prec_no") else {
            continue;
        };
        let name = area.value().attr("alt").unwrap_or_default().to_string();
        match groups.iter_mut().find(|g| g.prec_no == prec_no) {
            Some(existing) => existing.name = name,
            None => groups.push(StationGroup { prec_no, name }),
        }
    }
    Ok(groups)
}

fn view_point_args(handler: &str) -> Vec<String> {
    let inner = handler.trim();
    let inner = inner.strip_prefix(VIEW_POINT_PREFIX).unwrap_or(inner);
    let inner = inner.strip_suffix(");").unwrap_or(inner);
    inner.split(',').map(|arg| arg.replace('\'', "")).collect()
}

fn flag(value: &str) -> bool {
    value.trim().parse::<i64>().map(|v| v != 0).unwrap_or(false)
}

fn station_from_area(
    page: &str,
    prec_no: &str,
    group_name: &str,
    handler: &str,
) -> Result<StationRecord, AmedasError> {
    let args = view_point_args(handler);
    let malformed = |reason: String| AmedasError::StationArea {
        page: page.to_string(),
        reason,
    };
    if args.len() < VIEW_POINT_ARGS {
        return Err(malformed(format!(
            "expected {} viewPoint arguments, got {}",
            VIEW_POINT_ARGS,
            args.len()
        )));
    }
    let number = |index: usize| -> Result<f64, AmedasError> {
        args[index]
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(format!("argument {} is not a number: '{}'", index, args[index])))
    };
    let degrees = |index: usize| -> Result<u16, AmedasError> {
        args[index]
            .trim()
            .parse::<u16>()
            .map_err(|_| malformed(format!("argument {} is not a degree: '{}'", index, args[index])))
    };

    let block_no = args[1].trim().to_string();
    let network = if args[0].trim() == "s" {
        NetworkType::Kan
    } else {
        SensorFlags {
            rain: flag(&args[9]),
            wind: flag(&args[10]),
            temperature: flag(&args[11]),
            sunshine: flag(&args[12]),
            snow: flag(&args[13]),
        }
        .network_type()
    };
    let yomi = YOMI_FIXES
        .iter()
        .find(|(fixed_block, _)| *fixed_block == block_no)
        .map(|(_, yomi)| yomi.to_string())
        .unwrap_or_else(|| args[3].trim().to_string());

    Ok(StationRecord {
        oid: format!("{}{}", prec_no, block_no),
        prec_no: prec_no.to_string(),
        name: args[2].trim().to_string(),
        yomi,
        group_name: group_name.to_string(),
        lat: DegreeMinute::from((degrees(4)?, number(5)?)),
        long: DegreeMinute::from((degrees(6)?, number(7)?)),
        elev: number(8)?,
        obstype: network,
        block_no,
    })
}

/// Station records of one group page, in page order.
pub fn parse_station_areas(
    page: &Url,
    html: &str,
    groups: &[StationGroup],
) -> Result<Vec<StationRecord>, AmedasError> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();
    for area in map_areas(&document)? {
        let Some(handler) = area.value().attr("onmouseover") else {
            continue;
        };
        let link = join_url(page, area.value().attr("href").unwrap_or_default())?;
        if is_group_link(&link) {
            continue;
        }
        let prec_no = query_value(&link, "prec_no").ok_or_else(|| AmedasError::StationArea {
            page: page.to_string(),
            reason: format!("no prec_no in '{}'", link),
        })?;
        let group_name = groups
            .iter()
            .find(|g| g.prec_no == prec_no)
            .map(|g| g.name.as_str())
            .unwrap_or_default();
        records.push(station_from_area(page.as_str(), &prec_no, group_name, handler)?);
    }
    Ok(records)
}

pub struct RegistryUpdater {
    logger: Logger,
    source: Arc<dyn PageSource>,
    select_url: Url,
}

impl RegistryUpdater {
    /// `select_url` is the directory holding the station selection pages and
    /// should end with a slash.
    pub fn new(
        logger: Logger,
        source: Arc<dyn PageSource>,
        select_url: &str,
    ) -> Result<Self, AmedasError> {
        Ok(RegistryUpdater {
            logger,
            source,
            select_url: parse_url(select_url)?,
        })
    }

    fn group_url(&self, prec_no: &str) -> Result<Url, AmedasError> {
        let mut url = join_url(&self.select_url, "prefecture.php")?;
        url.query_pairs_mut().append_pair("prec_no", prec_no);
        Ok(url)
    }

    pub async fn fetch_groups(&self) -> Result<Vec<StationGroup>, AmedasError> {
        let url = join_url(&self.select_url, "prefecture00.php")?;
        info!(self.logger, "fetching group list: {}", url);
        let html = self.source.fetch(url.as_str()).await?;
        parse_group_index(&url, &html)
    }

    /// Every station of every group, keyed by oid in first-seen order.
    pub async fn fetch_stations(&self) -> Result<Map<String, Value>, AmedasError> {
        let groups = self.fetch_groups().await?;
        info!(self.logger, "found {} groups", groups.len());

        let mut stations = Map::new();
        for group in &groups {
            let url = self.group_url(&group.prec_no)?;
            let html = self.source.fetch(url.as_str()).await?;
            let records = parse_station_areas(&url, &html, &groups)?;
            debug!(
                self.logger,
                "{} {}: {} stations",
                group.prec_no,
                group.name,
                records.len()
            );
            for record in records {
                let value = serde_json::to_value(&record)?;
                stations.insert(record.oid, value);
            }
        }
        Ok(stations)
    }

    /// Writes the rebuilt list to `path` and returns how many stations it holds.
    pub async fn update(&self, path: &Path) -> Result<usize, AmedasError> {
        let stations = self.fetch_stations().await?;
        let count = stations.len();
        let json = serde_json::to_string_pretty(&Value::Object(stations))?;
        fs::write(path, json).map_err(|e| AmedasError::Io(path.to_path_buf(), e))?;
        info!(self.logger, "wrote {} stations to {}", count, path.display());
        Ok(count)
    }
}
