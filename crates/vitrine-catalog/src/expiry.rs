//! Expiry normalization and validation.
//!
//! Spreadsheet editors type expiry dates in whatever shape is at hand. The
//! compact `YYYYMMDD HH:MM:SS` form is rewritten to ISO-8601; every other
//! value passes through untouched. Validation is a separate step so a bad
//! value only costs its card the countdown.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use regex::Regex;

static COMPACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})[ \-A-Za-z]?(\d{2}):(\d{2}):(\d{2})$")
        .expect("valid compact expiry regex")
});

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Rewrites `20280303 18:12:12` (separator optional: space, dash or a
/// letter) as `2028-03-03T18:12:12`. Other input is returned trimmed.
#[must_use]
pub fn normalize_expiry(raw: &str) -> String {
    let trimmed = raw.trim();
    match COMPACT_RE.captures(trimmed) {
        Some(caps) => format!(
            "{}-{}-{}T{}:{}:{}",
            &caps[1], &caps[2], &caps[3], &caps[4], &caps[5], &caps[6]
        ),
        None => trimmed.to_string(),
    }
}

/// Resolves a normalized expiry to an absolute instant.
///
/// Values without a zone are read in `offset`. A bare date means the end of
/// that day. Returns `None` when nothing matches.
#[must_use]
pub fn parse_expiry(value: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| NaiveTime::from_hms_opt(23, 59, 59).map(|t| d.and_time(t)))
        })?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).expect("valid offset")
    }

    #[test]
    fn compact_with_space_is_rewritten() {
        assert_eq!(normalize_expiry("20280303 18:12:12"), "2028-03-03T18:12:12");
    }

    #[test]
    fn compact_separators_are_all_accepted() {
        for raw in ["20280303-18:12:12", "20280303T18:12:12", "2028030318:12:12"] {
            assert_eq!(normalize_expiry(raw), "2028-03-03T18:12:12", "input {raw}");
        }
    }

    #[test]
    fn unrecognized_shapes_pass_through_trimmed() {
        assert_eq!(normalize_expiry("  2026-12-31T23:59:59 "), "2026-12-31T23:59:59");
        assert_eq!(normalize_expiry("not-a-date"), "not-a-date");
    }

    #[test]
    fn compact_and_iso_resolve_to_the_same_instant() {
        let compact = parse_expiry(&normalize_expiry("20280303 18:12:12"), brt());
        let iso = parse_expiry("2028-03-03T18:12:12", brt());
        assert!(compact.is_some());
        assert_eq!(compact, iso);
    }

    #[test]
    fn naive_values_are_read_in_the_display_offset() {
        let parsed = parse_expiry("2026-12-31T23:59:59", brt()).expect("parse");
        assert_eq!(parsed.to_rfc3339(), "2027-01-01T02:59:59+00:00");
    }

    #[test]
    fn rfc3339_keeps_its_own_zone() {
        let parsed = parse_expiry("2026-12-31T23:59:59Z", brt()).expect("parse");
        assert_eq!(parsed.to_rfc3339(), "2026-12-31T23:59:59+00:00");
    }

    #[test]
    fn space_separated_and_minute_precision_forms_parse() {
        assert!(parse_expiry("2026-12-31 23:59:59", brt()).is_some());
        assert!(parse_expiry("2026-12-31T23:59", brt()).is_some());
    }

    #[test]
    fn bare_date_means_end_of_day() {
        let date_only = parse_expiry("2026-12-31", brt());
        let end_of_day = parse_expiry("2026-12-31T23:59:59", brt());
        assert_eq!(date_only, end_of_day);
    }

    #[test]
    fn garbage_does_not_parse() {
        assert_eq!(parse_expiry("not-a-date", brt()), None);
        assert_eq!(parse_expiry("", brt()), None);
        assert_eq!(parse_expiry("2026-13-45T99:00:00", brt()), None);
    }
}
