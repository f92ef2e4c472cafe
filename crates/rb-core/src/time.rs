use chrono::{DateTime, NaiveDateTime, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Compact UTC token used in default artifact names, e.g. `20260101T120000Z`.
pub fn timestamp_token(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn date_utc(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Lenient timestamp parse: RFC 3339, or a naive ISO datetime taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn token_is_compact_utc() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(timestamp_token(&at), "20260304T050607Z");
        assert_eq!(date_utc(&at), "2026-03-04");
    }

    #[test]
    fn parses_offset_and_naive_timestamps() {
        let a = parse_timestamp("2026-01-01T10:00:00+02:00").unwrap();
        let b = parse_timestamp("2026-01-01T08:00:00").unwrap();
        assert_eq!(a, b);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
