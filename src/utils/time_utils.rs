//! BSON 시각 변환 유틸리티

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::DateTime;

/// API 응답용 RFC 3339 문자열
pub fn to_rfc3339(value: DateTime) -> String {
    value
        .try_to_rfc3339_string()
        .unwrap_or_else(|_| value.timestamp_millis().to_string())
}

pub fn from_chrono(value: ChronoDateTime<Utc>) -> DateTime {
    DateTime::from_millis(value.timestamp_millis())
}

/// `base`로부터 `duration` 뒤의 시각
pub fn add_duration(base: DateTime, duration: chrono::Duration) -> DateTime {
    DateTime::from_millis(base.timestamp_millis() + duration.num_milliseconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_rfc3339() {
        assert!(to_rfc3339(DateTime::from_millis(0)).starts_with("1970-01-01T00:00:00"));
    }

    #[test]
    fn test_from_chrono() {
        let value = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(from_chrono(value).timestamp_millis(), value.timestamp_millis());
    }

    #[test]
    fn test_add_duration() {
        let start = DateTime::from_millis(1_000);
        let end = add_duration(start, chrono::Duration::days(7));
        assert_eq!(end.timestamp_millis(), 1_000 + 7 * 24 * 60 * 60 * 1000);
    }
}
