//! Position sources feeding entities
//!
//! A source produces validated, timestamped position fixes until it closes.
//! The tracker pulls from sources; it does not care whether the fixes come
//! from a GPS receiver, a telemetry link or a recorded log.

pub mod log_file;

pub use log_file::LogFilePositionSource;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::tracking::entity::PositionInfo;

/// Anything producing position fixes
pub trait PositionSource {
    /// Next valid fix, or `None` once the source has closed
    fn next_position(&mut self) -> Option<PositionInfo>;

    /// Most recent fix delivered by [`PositionSource::next_position`]
    fn last_known_position(&self) -> Option<PositionInfo>;
}

impl<S: PositionSource + ?Sized> PositionSource for Box<S> {
    fn next_position(&mut self) -> Option<PositionInfo> {
        (**self).next_position()
    }

    fn last_known_position(&self) -> Option<PositionInfo> {
        (**self).last_known_position()
    }
}

/// Parses an ISO 8601 timestamp
///
/// Accepts RFC 3339 (with offset) or a bare local date-time, which is read as
/// UTC. Returns `None` when neither form matches.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2009-08-24T22:25:01")]
    #[case("2009-08-24T22:25:01Z")]
    #[case("2009-08-24T22:25:01+00:00")]
    #[case("2009-08-25T00:25:01+02:00")]
    fn test_parse_timestamp(#[case] text: &str) {
        let expected = Utc.with_ymd_and_hms(2009, 8, 24, 22, 25, 1).unwrap();
        assert_eq!(parse_timestamp(text), Some(expected));
    }

    #[test]
    fn test_fractional_seconds() {
        let stamp = parse_timestamp("2009-08-24T22:25:01.250").unwrap();
        assert_eq!(stamp.timestamp_subsec_millis(), 250);
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2009-13-24T22:25:01")]
    #[case("2009-08-24")]
    fn test_parse_timestamp_rejects(#[case] text: &str) {
        assert_eq!(parse_timestamp(text), None);
    }
}
