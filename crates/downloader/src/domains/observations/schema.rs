use crate::{DataType, NetworkType};

/// Id of the data table on every supported viewer page.
pub const DATA_TABLE_ID: &str = "tablefix1";

const TENMINUTES_KAN: &[&str] = &[
    "時分",
    "現地気圧(hPa)",
    "海面気圧(hPa)",
    "降水量(mm)",
    "気温(℃)",
    "相対湿度(％)",
    "平均風速(m/s)",
    "平均風向",
    "最大瞬間風速(m/s)",
    "最大瞬間風向",
    "日照時間(分)",
];

const TENMINUTES_AUTO4: &[&str] = &[
    "時分",
    "降水量(mm)",
    "気温(℃)",
    "相対湿度（%）",
    "平均風速(m/s)",
    "平均風向",
    "最大瞬間風速(m/s)",
    "最大瞬間風向",
    "日照時間(分)",
];

const HOUR_KAN: &[&str] = &[
    "時",
    "現地気圧(hPa)",
    "海面気圧(hPa)",
    "降水量(mm)",
    "気温(℃)",
    "露点温度(℃)",
    "蒸気圧(hPa)",
    "湿度(％)",
    "風速(m/s)",
    "風向",
    "日照時間(h)",
    "全天日射量(MJ/m^2)",
    "降雪(cm)",
    "積雪(cm)",
    "天気記号",
    "雲量",
    "視程(km)",
];

const HOUR_AUTO4: &[&str] = &[
    "時",
    "降水量(mm)",
    "気温(℃)",
    "露点温度(℃)",
    "蒸気圧(hPa)",
    "湿度(％)",
    "平均風速(m/s)",
    "風向",
    "日照時間(h)",
    "降雪(cm)",
    "積雪(cm)",
];

/// How far CSV output is worked out for a data type / network pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaSupport {
    /// Column labels and header row count are known.
    Complete,
    /// The data type is supported but labels for this network are not
    /// written yet; rows are still extracted, under an empty header.
    HeadersPending,
    /// CSV output is not available for the data type at all.
    Unsupported,
}

/// Where the data sits on a page and what its columns are called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table_id: &'static str,
    pub table_index: usize,
    pub headers: &'static [&'static str],
    pub header_rows: usize,
    pub support: SchemaSupport,
}

impl TableSchema {
    const fn new(headers: &'static [&'static str], header_rows: usize, support: SchemaSupport) -> Self {
        TableSchema {
            table_id: DATA_TABLE_ID,
            table_index: 0,
            headers,
            header_rows,
            support,
        }
    }
}

/// Only ten-minute and hourly pages can be converted to CSV.
pub fn supports_csv(data_type: DataType) -> bool {
    matches!(data_type, DataType::TenMinutes | DataType::Hour)
}

pub fn resolve_schema(data_type: DataType, network: NetworkType) -> TableSchema {
    use NetworkType::*;
    use SchemaSupport::*;

    match (data_type, network) {
        (DataType::TenMinutes, Kan) => TableSchema::new(TENMINUTES_KAN, 2, Complete),
        (DataType::TenMinutes, Auto4) => TableSchema::new(TENMINUTES_AUTO4, 3, Complete),
        (DataType::Hour, Kan) => TableSchema::new(HOUR_KAN, 2, Complete),
        (DataType::Hour, Auto4) => TableSchema::new(HOUR_AUTO4, 2, Complete),
        (DataType::TenMinutes | DataType::Hour, Auto3 | AutoRain | AutoSnow) => {
            TableSchema::new(&[], 0, HeadersPending)
        }
        _ => TableSchema::new(&[], 0, Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tenminutes_kan() {
        let schema = resolve_schema(DataType::TenMinutes, NetworkType::Kan);
        assert_eq!(schema.headers.len(), 11);
        assert_eq!(schema.headers[0], "時分");
        assert_eq!(schema.header_rows, 2);
        assert_eq!(schema.table_id, "tablefix1");
        assert_eq!(schema.table_index, 0);
        assert_eq!(schema.support, SchemaSupport::Complete);
    }

    #[test]
    fn test_defined_combinations() {
        let auto4 = resolve_schema(DataType::TenMinutes, NetworkType::Auto4);
        assert_eq!((auto4.headers.len(), auto4.header_rows), (9, 3));

        let hour_kan = resolve_schema(DataType::Hour, NetworkType::Kan);
        assert_eq!((hour_kan.headers.len(), hour_kan.header_rows), (17, 2));

        let hour_auto4 = resolve_schema(DataType::Hour, NetworkType::Auto4);
        assert_eq!((hour_auto4.headers.len(), hour_auto4.header_rows), (11, 2));
    }

    #[test]
    fn test_pending_headers() {
        for network in [NetworkType::Auto3, NetworkType::AutoRain, NetworkType::AutoSnow] {
            let schema = resolve_schema(DataType::Hour, network);
            assert!(schema.headers.is_empty());
            assert_eq!(schema.header_rows, 0);
            assert_eq!(schema.support, SchemaSupport::HeadersPending);
        }
    }

    #[test]
    fn test_unsupported_data_types() {
        let schema = resolve_schema(DataType::Annual, NetworkType::Kan);
        assert!(schema.headers.is_empty());
        assert_eq!(schema.support, SchemaSupport::Unsupported);

        for data_type in DataType::ALL {
            let supported = resolve_schema(data_type, NetworkType::Kan).support
                != SchemaSupport::Unsupported;
            assert_eq!(supported, supports_csv(data_type));
        }
    }
}
