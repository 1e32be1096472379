//! Date grammars used by the feed formats.
//!
//! RSS `pubDate` uses RFC 822, while RDF `dc:date` and Atom use RFC 3339.
//! Values are carried at second precision; sub-second parts are truncated.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// Drops the sub-second part of a timestamp (truncation, never rounding).
pub fn truncate(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.trunc_subsecs(0)
}

/// Renders `Tue, 01 Jul 2003 10:52:37 GMT`.
pub fn to_rfc822(dt: DateTime<Utc>) -> String {
    truncate(dt).format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Renders `2003-07-01T10:52:37Z`.
pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    truncate(dt).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an RFC 822 date, returning `None` (and logging) when malformed.
pub fn from_rfc822(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    match DateTime::parse_from_rfc2822(trimmed) {
        Ok(dt) => Some(truncate(dt.with_timezone(&Utc))),
        Err(e) => {
            tracing::warn!(value = %trimmed, error = %e, "Ignoring malformed RFC 822 date");
            None
        }
    }
}

/// Parses an RFC 3339 date, returning `None` (and logging) when malformed.
pub fn from_rfc3339(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => Some(truncate(dt.with_timezone(&Utc))),
        Err(e) => {
            tracing::warn!(value = %trimmed, error = %e, "Ignoring malformed RFC 3339 date");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2003, 7, 1, 10, 52, 37).unwrap()
    }

    #[test]
    fn test_rfc822_rendering() {
        assert_eq!(to_rfc822(sample()), "Tue, 01 Jul 2003 10:52:37 GMT");
    }

    #[test]
    fn test_rfc3339_rendering() {
        assert_eq!(to_rfc3339(sample()), "2003-07-01T10:52:37Z");
    }

    #[test]
    fn test_rfc822_parses_own_output() {
        assert_eq!(from_rfc822(&to_rfc822(sample())), Some(sample()));
    }

    #[test]
    fn test_rfc822_accepts_numeric_offset() {
        let parsed = from_rfc822("Tue, 01 Jul 2003 12:52:37 +0200");
        assert_eq!(parsed, Some(sample()));
    }

    #[test]
    fn test_rfc3339_normalizes_offset() {
        let parsed = from_rfc3339("2003-07-01T12:52:37+02:00");
        assert_eq!(parsed, Some(sample()));
    }

    #[test]
    fn test_fractional_seconds_truncated_not_rounded() {
        let parsed = from_rfc3339("2003-07-01T10:52:37.999Z");
        assert_eq!(parsed, Some(sample()));

        let precise = Utc.timestamp_opt(sample().timestamp(), 999_999_999).unwrap();
        assert_eq!(truncate(precise), sample());
        assert_eq!(to_rfc3339(precise), "2003-07-01T10:52:37Z");
    }

    #[test]
    fn test_malformed_dates_are_absent() {
        assert_eq!(from_rfc822("yesterday"), None);
        assert_eq!(from_rfc3339("2003-13-45"), None);
        assert_eq!(from_rfc3339(""), None);
    }
}
