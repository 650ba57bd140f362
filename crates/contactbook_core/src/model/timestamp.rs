//! ISO-8601 timestamp helpers for persisted contact metadata.
//!
//! # Invariants
//! - Stored timestamps carry millisecond precision in UTC (`...T..:..:..sssZ`).
//! - Parsing accepts any RFC 3339 offset and normalizes to UTC. ISO-8601
//!   local date-times and plain dates carry no offset and are read as UTC.
//! - Parsed values are truncated to storage precision.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::Serializer;

/// Truncates a timestamp to the millisecond precision used in storage.
pub fn to_storage_precision(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(3)
}

/// Formats a timestamp the way it is persisted.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted timestamp.
///
/// Accepted forms, in order: RFC 3339 (`2024-05-01T10:00:00.000Z`),
/// offset-less date-time (`2024-05-01T10:00:00`, `2024-05-01 10:00`) and
/// date only (`2024-05-01`, midnight UTC). Returns `None` otherwise.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(to_storage_precision(parsed.with_timezone(&Utc)));
    }

    LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| to_storage_precision(naive.and_utc()))
}

const LOCAL_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Returns the next `updatedAt` value for a record last touched at `previous`.
///
/// The result is always strictly after `previous`, even when the clock has
/// not advanced (or has gone backwards) since the last write.
pub fn next_update_stamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = to_storage_precision(now);
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

pub(crate) fn serialize_timestamp<S>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(value))
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, next_update_stamp, parse_timestamp};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn format_uses_millisecond_precision_and_zulu_suffix() {
        let value = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        assert_eq!(format_timestamp(&value), "2026-10-19T08:30:00.000Z");
    }

    #[test]
    fn parse_normalizes_offsets_to_utc() {
        let parsed = parse_timestamp("2026-10-19T10:30:00.250+02:00").unwrap();
        assert_eq!(format_timestamp(&parsed), "2026-10-19T08:30:00.250Z");
    }

    #[test]
    fn parse_reads_offsetless_date_time_as_utc() {
        let parsed = parse_timestamp("2024-05-01T10:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap());

        let fractional = parse_timestamp("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(format_timestamp(&fractional), "2024-05-01T10:00:00.123Z");
        assert!(parse_timestamp("2024-05-01 10:00").is_some());
    }

    #[test]
    fn parse_reads_plain_date_as_utc_midnight() {
        let parsed = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
        assert!(parse_timestamp("2024-05-01T25:00:00").is_none());
    }

    #[test]
    fn next_update_stamp_is_strictly_increasing_when_clock_stalls() {
        let previous = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            next_update_stamp(previous, previous),
            previous + Duration::milliseconds(1)
        );
        assert_eq!(
            next_update_stamp(previous, previous - Duration::seconds(5)),
            previous + Duration::milliseconds(1)
        );
        let later = previous + Duration::seconds(2);
        assert_eq!(next_update_stamp(previous, later), later);
    }
}
