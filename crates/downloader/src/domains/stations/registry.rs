use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::{AmedasError, Station};

const BUNDLED_STATIONS: &str = include_str!("../../../data/stations.json");

/// Read-only list of known stations, in the order of the source mapping.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: Vec<Station>,
}

impl StationRegistry {
    /// Parses a JSON object of `oid -> station record`. Any malformed record
    /// fails the whole load.
    pub fn load(source: &str) -> Result<Self, AmedasError> {
        let raw: Map<String, Value> = serde_json::from_str(source)?;
        let mut stations = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let station: Station = serde_json::from_value(value).map_err(|source| {
                AmedasError::RegistryRecord {
                    oid: key.clone(),
                    source,
                }
            })?;
            if station.oid != key {
                return Err(AmedasError::RegistryKeyMismatch {
                    key,
                    oid: station.oid,
                });
            }
            stations.push(station);
        }
        Ok(StationRegistry { stations })
    }

    /// Station list compiled into the binary.
    pub fn bundled() -> Result<Self, AmedasError> {
        Self::load(BUNDLED_STATIONS)
    }

    pub fn from_path(path: &Path) -> Result<Self, AmedasError> {
        let content =
            fs::read_to_string(path).map_err(|e| AmedasError::Io(path.to_path_buf(), e))?;
        Self::load(&content)
    }

    pub fn list(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn find_by_id(&self, oid: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.oid == oid)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.name == name)
    }

    /// First station carrying `block_no`; block numbers are not unique across
    /// prefectures so the registry order decides.
    pub fn find_by_block_no(&self, block_no: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.block_no == block_no)
    }
}
