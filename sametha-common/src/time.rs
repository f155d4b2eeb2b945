//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// Display and storage format of submission timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current wall-clock time, second precision, as stamped on submissions
pub fn submission_timestamp() -> NaiveDateTime {
    let local = Local::now().naive_local();
    parse_timestamp(&local.format(TIMESTAMP_FORMAT).to_string()).unwrap_or(local)
}

/// Parse a stored timestamp.
///
/// Accepts the canonical format plus the shapes spreadsheet tools write back
/// after a hand edit (minute precision, `T` separator, RFC 3339).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    const FORMATS: &[&str] = &[TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Serde adapter for [`TIMESTAMP_FORMAT`] columns
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(super::TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_submission_timestamp_has_second_precision() {
        let stamp = submission_timestamp();
        assert_eq!(stamp.nanosecond(), 0);
    }

    #[test]
    fn test_parse_canonical_format() {
        let parsed = parse_timestamp("2024-03-05 07:08:09").unwrap();
        assert_eq!(parsed.format(TIMESTAMP_FORMAT).to_string(), "2024-03-05 07:08:09");
    }

    #[test]
    fn test_parse_hand_edited_formats() {
        assert!(parse_timestamp("2024-03-05 07:08").is_some());
        assert!(parse_timestamp("2024-03-05T07:08:09").is_some());
        assert!(parse_timestamp("2024-03-05T07:08:09+05:30").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
