//! Timestamp parsing for ISO-8601 values reported by the media server.
//!
//! Jellyfin reports creation dates with up to seven fractional digits and a
//! trailing `Z`; hand-edited watermark files may omit the offset entirely.
//! Values without an offset are taken to be UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::{Error, Result};

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 values, naive `YYYY-MM-DDTHH:MM:SS[.fff]` values, and
/// bare `YYYY-MM-DD` dates (midnight).
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(Error::format(format!("not an ISO-8601 timestamp: {value:?}")))
}

/// Format a timestamp as RFC 3339 with second precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_naive() {
        let ts = parse_timestamp("2024-01-05T00:00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_jellyfin_precision() {
        let ts = parse_timestamp("2024-03-10T18:22:41.1234567Z").unwrap();
        assert_eq!(
            ts.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_parse_offset_normalized() {
        let ts = parse_timestamp("2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_only() {
        let ts = parse_timestamp("2023-12-31").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_timestamp("not-a-date"), Err(Error::Format(_))));
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 15).unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text, "2024-06-01T12:30:15Z");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }
}
