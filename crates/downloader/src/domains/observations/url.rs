use time::{macros::time, Duration, OffsetDateTime, PrimitiveDateTime};

use crate::{AmedasError, DataType, Station};

/// Current wall-clock time, local offset when the platform can tell us, UTC otherwise.
pub fn local_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Latest instant the portal has complete pages for: yesterday 23:59:59.
/// Anything at or after it is refused.
pub fn publication_threshold(now: PrimitiveDateTime) -> PrimitiveDateTime {
    let yesterday = (now - Duration::days(1)).date();
    PrimitiveDateTime::new(yesterday, time!(23:59:59))
}

pub fn validate_date(date: PrimitiveDateTime, now: PrimitiveDateTime) -> Result<(), AmedasError> {
    let threshold = publication_threshold(now);
    if date < threshold {
        Ok(())
    } else {
        Err(AmedasError::InvalidDate { date, threshold })
    }
}

/// Builds the viewer page URL for one station, data type and day.
///
/// Query keys are emitted in the order the portal expects:
/// `prec_no`, `block_no`, `year`, `month`, `day`, `view`.
pub fn build_url(
    base_url: &str,
    station: &Station,
    data_type: DataType,
    date: PrimitiveDateTime,
    now: PrimitiveDateTime,
) -> Result<String, AmedasError> {
    validate_date(date, now)?;
    if !station.is_registered() {
        return Err(AmedasError::UnregisteredStation(station.oid.clone()));
    }
    Ok(format!(
        "{}{}.php?prec_no={}&block_no={}&year={}&month={:02}&day={:02}&view=",
        base_url,
        data_type.path_segment(station.route()),
        station.prec_no,
        station.block_no,
        date.year(),
        u8::from(date.month()),
        date.day(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNREGISTERED_BLOCK_NO;
    use amedas_core::DEFAULT_BASE_URL;
    use time::macros::datetime;

    fn station(block_no: &str, obstype: &str) -> Station {
        serde_json::from_value(serde_json::json!({
            "oid": format!("67{}", block_no),
            "prec_no": "67",
            "block_no": block_no,
            "name": "広島",
            "group_name": "広島県",
            "lat": [34, 23.9],
            "long": [132, 27.7],
            "elev": 3.6,
            "obstype": obstype
        }))
        .unwrap()
    }

    #[test]
    fn test_threshold_is_end_of_yesterday() {
        assert_eq!(
            publication_threshold(datetime!(2023-06-03 08:15:00)),
            datetime!(2023-06-02 23:59:59)
        );
        assert_eq!(
            publication_threshold(datetime!(2024-03-01 00:00:00)),
            datetime!(2024-02-29 23:59:59)
        );
    }

    #[test]
    fn test_validate_date_boundary() {
        let now = datetime!(2023-06-03 12:00:00);
        assert!(matches!(
            validate_date(datetime!(2023-06-02 23:59:59), now),
            Err(AmedasError::InvalidDate { .. })
        ));
        assert!(validate_date(datetime!(2023-06-02 23:59:58.999999), now).is_ok());
        assert!(validate_date(datetime!(2023-06-02 00:00:00), now).is_ok());
        assert!(validate_date(datetime!(2023-06-03 00:00:00), now).is_err());
        assert!(validate_date(datetime!(2023-06-10 00:00:00), now).is_err());
    }

    #[test]
    fn test_build_url_automatic_station() {
        let url = build_url(
            DEFAULT_BASE_URL,
            &station("67437", "auto4"),
            DataType::TenMinutes,
            datetime!(2023-06-01 00:00:00),
            datetime!(2023-07-01 09:00:00),
        )
        .unwrap();
        assert_eq!(
            url,
            "https://www.data.jma.go.jp/obd/stats/etrn/view/10min_a1.php?prec_no=67&block_no=67437&year=2023&month=06&day=01&view="
        );
    }

    #[test]
    fn test_build_url_staffed_station_is_stable() {
        let hiroshima = station("47765", "kan");
        let now = datetime!(2024-01-01 00:00:00);
        let first = build_url(
            DEFAULT_BASE_URL,
            &hiroshima,
            DataType::Hour,
            datetime!(2023-12-09 00:00:00),
            now,
        )
        .unwrap();
        let second = build_url(
            DEFAULT_BASE_URL,
            &hiroshima,
            DataType::Hour,
            datetime!(2023-12-09 00:00:00),
            now,
        )
        .unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with(
            "hourly_s1.php?prec_no=67&block_no=47765&year=2023&month=12&day=09&view="
        ));
    }

    #[test]
    fn test_build_url_unregistered_station() {
        let result = build_url(
            DEFAULT_BASE_URL,
            &station(UNREGISTERED_BLOCK_NO, "autorain"),
            DataType::Day,
            datetime!(2023-06-01 00:00:00),
            datetime!(2023-07-01 00:00:00),
        );
        assert!(matches!(result, Err(AmedasError::UnregisteredStation(_))));
    }

    #[test]
    fn test_build_url_checks_date_first() {
        let result = build_url(
            DEFAULT_BASE_URL,
            &station(UNREGISTERED_BLOCK_NO, "autorain"),
            DataType::Day,
            datetime!(2023-07-01 00:00:00),
            datetime!(2023-07-01 00:00:00),
        );
        assert!(matches!(result, Err(AmedasError::InvalidDate { .. })));
    }
}
