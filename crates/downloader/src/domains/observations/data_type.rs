use std::fmt;
use std::str::FromStr;

use crate::Route;

/// Time granularity of a viewer page on the data portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Annual,
    ThreeMonth,
    AllMonth,
    YearMonth,
    TenDays,
    FiveDays,
    Day,
    Hour,
    TenMinutes,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unsupported data type '{0}'")]
pub struct UnknownDataType(pub String);

const ROUTE_PLACEHOLDER: &str = "#SPEC#";

impl DataType {
    pub const ALL: [DataType; 9] = [
        DataType::Annual,
        DataType::ThreeMonth,
        DataType::AllMonth,
        DataType::YearMonth,
        DataType::TenDays,
        DataType::FiveDays,
        DataType::Day,
        DataType::Hour,
        DataType::TenMinutes,
    ];

    /// Upper-case name, also used in output file names.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Annual => "ANNUAL",
            DataType::ThreeMonth => "THREEMONTH",
            DataType::AllMonth => "ALLMONTH",
            DataType::YearMonth => "YEARMONTH",
            DataType::TenDays => "TENDAYS",
            DataType::FiveDays => "FIVEDAYS",
            DataType::Day => "DAY",
            DataType::Hour => "HOUR",
            DataType::TenMinutes => "TENMINUTES",
        }
    }

    fn path_template(&self) -> &'static str {
        match self {
            DataType::Annual => "annually_#SPEC#",
            DataType::ThreeMonth => "3monthly_#SPEC#1",
            DataType::AllMonth => "monthly_#SPEC#3",
            DataType::YearMonth => "monthly_#SPEC#1",
            DataType::TenDays => "10daily_#SPEC#1",
            DataType::FiveDays => "mb5daily_#SPEC#1",
            DataType::Day => "daily_#SPEC#1",
            DataType::Hour => "hourly_#SPEC#1",
            DataType::TenMinutes => "10min_#SPEC#1",
        }
    }

    /// Viewer page name (without `.php`) for stations served by `route`.
    pub fn path_segment(&self, route: Route) -> String {
        self.path_template()
            .replace(ROUTE_PLACEHOLDER, route.as_str())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DataType {
    type Err = UnknownDataType;

    /// Case-insensitive: `TenMinutes`, `tenminutes` and `TENMINUTES` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        DataType::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| UnknownDataType(s.to_string()))
    }
}
