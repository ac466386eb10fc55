//! Lenient creation-timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a client-supplied creation timestamp.
///
/// Tries RFC 3339 first, then a few common camera/export formats. Returns
/// `None` for anything unparseable; callers sort those as least-recent.
pub fn parse_creation_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // EXIF-style and plain datetime formats
    for fmt in ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        let dt = parse_creation_time("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1714557600);
    }

    #[test]
    fn test_exif_format() {
        assert!(parse_creation_time("2024:05:01 10:00:00").is_some());
    }

    #[test]
    fn test_date_only() {
        assert!(parse_creation_time("2024-05-01").is_some());
    }

    #[test]
    fn test_garbage_is_none() {
        assert!(parse_creation_time("not a date").is_none());
        assert!(parse_creation_time("").is_none());
    }

    #[test]
    fn test_ordering() {
        let older = parse_creation_time("2024-05-01T10:00:00Z").unwrap();
        let newer = parse_creation_time("2024-05-02T10:00:00Z").unwrap();
        assert!(newer > older);
    }
}
