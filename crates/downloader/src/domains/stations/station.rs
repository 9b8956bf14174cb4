use serde::{Deserialize, Serialize};
use std::fmt;

/// Block number used by the station list for sites the portal has no page for yet.
pub const UNREGISTERED_BLOCK_NO: &str = "NoRegist";

/// Observation network a station belongs to; decides which columns its pages carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Staffed weather station (kansokusho)
    #[default]
    Kan,
    /// Automatic station measuring rain, temperature, wind and sunshine
    Auto4,
    /// Automatic station measuring rain, temperature and wind
    Auto3,
    /// Automatic rain gauge
    AutoRain,
    /// Automatic snow depth gauge
    AutoSnow,
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkType::Kan => "Weather Station",
            NetworkType::Auto4 => "AMeDAS (4 elements)",
            NetworkType::Auto3 => "AMeDAS (3 elements)",
            NetworkType::AutoRain => "AMeDAS (rain)",
            NetworkType::AutoSnow => "AMeDAS (snow)",
        };
        write!(f, "{}", label)
    }
}

/// Which family of viewer pages serves a station: `s` pages for staffed
/// stations, `a` pages for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Staffed,
    Automatic,
}

impl Route {
    /// Staffed stations carry WMO-style block numbers in the 47xxx range.
    pub fn from_block_no(block_no: &str) -> Self {
        match block_no.parse::<u32>() {
            Ok(47000..=47999) => Route::Staffed,
            _ => Route::Automatic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Staffed => "s",
            Route::Automatic => "a",
        }
    }
}

/// Latitude or longitude split into whole degrees and decimal minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u16, f64)", into = "(u16, f64)")]
pub struct DegreeMinute {
    pub degrees: u16,
    pub minutes: f64,
}

impl From<(u16, f64)> for DegreeMinute {
    fn from((degrees, minutes): (u16, f64)) -> Self {
        DegreeMinute { degrees, minutes }
    }
}

impl From<DegreeMinute> for (u16, f64) {
    fn from(val: DegreeMinute) -> Self {
        (val.degrees, val.minutes)
    }
}

impl DegreeMinute {
    pub fn to_decimal(&self) -> f64 {
        f64::from(self.degrees) + self.minutes / 60.0
    }
}

/// Serialized form of a station as stored in the bundled station list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub oid: String,
    pub prec_no: String,
    pub block_no: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub yomi: String,
    pub group_name: String,
    pub lat: DegreeMinute,
    pub long: DegreeMinute,
    pub elev: f64,
    #[serde(default)]
    pub obstype: NetworkType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StationRecord", into = "StationRecord")]
pub struct Station {
    pub oid: String,
    pub prec_no: String,
    pub block_no: String,
    pub name: String,
    pub yomi: String,
    pub group_name: String,
    pub lat: DegreeMinute,
    pub long: DegreeMinute,
    pub elev: f64,
    pub network: NetworkType,
    route: Route,
}

impl From<StationRecord> for Station {
    fn from(val: StationRecord) -> Self {
        let route = Route::from_block_no(&val.block_no);
        Station {
            oid: val.oid,
            prec_no: val.prec_no,
            block_no: val.block_no,
            name: val.name,
            yomi: val.yomi,
            group_name: val.group_name,
            lat: val.lat,
            long: val.long,
            elev: val.elev,
            network: val.obstype,
            route,
        }
    }
}

impl From<Station> for StationRecord {
    fn from(val: Station) -> Self {
        StationRecord {
            oid: val.oid,
            prec_no: val.prec_no,
            block_no: val.block_no,
            name: val.name,
            yomi: val.yomi,
            group_name: val.group_name,
            lat: val.lat,
            long: val.long,
            elev: val.elev,
            obstype: val.network,
        }
    }
}

impl Station {
    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_registered(&self) -> bool {
        self.block_no != UNREGISTERED_BLOCK_NO
    }

    /// Label used by the interactive and fuzzy searches.
    pub fn search_label(&self) -> String {
        format!("{}{}", self.group_name, self.name)
    }

    /// Multi-line description printed by `--detail`.
    pub fn detail(&self) -> String {
        let mut lines = vec![
            format!("Location Name   :   {} （{}）", self.name, self.yomi),
            format!("Group Name      :   {}", self.group_name),
            format!("Station ID      :   {}", self.oid),
            format!("Prec Number     :   {}", self.prec_no),
            format!("Block Number    :   {}", self.block_no),
            format!("Observation Type:   {}", self.network),
            format!(
                "Coordinate Lat  :   N  {}° {}′",
                self.lat.degrees, self.lat.minutes
            ),
            format!(
                "Coordinate Long :   E {}° {}′",
                self.long.degrees, self.long.minutes
            ),
            format!("Elevation       :   {}m", self.elev),
        ];
        if !self.is_registered() {
            lines.push("State           :   not registered on the data portal".to_string());
        }
        lines.join("\n")
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} : {} {}", self.prec_no, self.block_no, self.name, self.yomi)
    }
}
