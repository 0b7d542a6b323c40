//! Relative timestamps ("42 minutes ago").
//!
//! Article timestamps arrive as `2017-09-13T18:04:29Z`.  This module parses
//! that one fixed layout and describes how far it lies from a reference
//! instant, in minutes, hours, or days.  Anything a week or more away is
//! shown as a calendar date instead.
//!
//! The reference instant is always passed in so that rendering is
//! deterministic under test; the UI passes `Utc::now()` once per frame.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

/// Layout of every timestamp the content API returns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Shown in place of a relative time when the timestamp cannot be parsed.
pub const TIME_UNAVAILABLE: &str = "time unavailable";

#[derive(Debug, Error)]
pub enum TimeError {
    #[error("timestamp {input:?} does not match YYYY-MM-DDThh:mm:ssZ")]
    Malformed {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Parse a `YYYY-MM-DDThh:mm:ssZ` timestamp (24-hour clock, UTC).
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TimeError> {
    NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| TimeError::Malformed {
            input: input.to_string(),
            source,
        })
}

/// Parse `input` and describe it relative to `now`.
pub fn format_relative(input: &str, now: DateTime<Utc>) -> Result<String, TimeError> {
    let then = parse_timestamp(input)?;
    Ok(relative_time_span(then, now))
}

/// Describe `then` relative to `now`.
///
/// Counts truncate toward zero, so anything under a minute reads
/// "0 minutes ago" (or "in 0 minutes").
pub fn relative_time_span(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    let past = delta >= TimeDelta::zero();
    let magnitude = delta.abs();

    let (count, unit) = if magnitude < TimeDelta::hours(1) {
        (magnitude.num_minutes(), "minute")
    } else if magnitude < TimeDelta::days(1) {
        (magnitude.num_hours(), "hour")
    } else if magnitude < TimeDelta::weeks(1) {
        (magnitude.num_days(), "day")
    } else {
        return absolute_date(then, now);
    };

    let plural = if count == 1 { "" } else { "s" };
    if past {
        format!("{count} {unit}{plural} ago")
    } else {
        format!("in {count} {unit}{plural}")
    }
}

fn absolute_date(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if then.year() == now.year() {
        then.format("%b %-d").to_string()
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn base() -> DateTime<Utc> {
        at(2017, 9, 13, 18, 4, 29)
    }

    #[test]
    fn forty_two_minutes_ago() {
        let now = base() + TimeDelta::minutes(42);
        assert_eq!(
            format_relative("2017-09-13T18:04:29Z", now).unwrap(),
            "42 minutes ago"
        );
    }

    #[test]
    fn afternoon_hours_parse_as_24_hour_clock() {
        let parsed = parse_timestamp("2017-09-13T18:04:29Z").unwrap();
        assert_eq!(parsed, base());
    }

    #[test]
    fn sub_minute_offsets_collapse_to_zero_minutes() {
        let now = base() + TimeDelta::seconds(59);
        assert_eq!(relative_time_span(base(), now), "0 minutes ago");
        assert_eq!(relative_time_span(base(), base()), "0 minutes ago");
    }

    #[test]
    fn singular_units() {
        assert_eq!(relative_time_span(base(), base() + TimeDelta::minutes(1)), "1 minute ago");
        assert_eq!(relative_time_span(base(), base() + TimeDelta::hours(1)), "1 hour ago");
        assert_eq!(relative_time_span(base(), base() + TimeDelta::days(1)), "1 day ago");
    }

    #[test]
    fn unit_changes_at_thresholds() {
        let cases = [
            (TimeDelta::minutes(59), "59 minutes ago"),
            (TimeDelta::minutes(60), "1 hour ago"),
            (TimeDelta::hours(23) + TimeDelta::minutes(59), "23 hours ago"),
            (TimeDelta::hours(24), "1 day ago"),
            (TimeDelta::days(6) + TimeDelta::hours(23), "6 days ago"),
        ];
        for (offset, expected) in cases {
            let span = relative_time_span(base(), base() + offset);
            assert_eq!(span, expected, "offset {offset}");
        }
    }

    #[test]
    fn a_week_or_more_shows_the_date() {
        let same_year = base() + TimeDelta::weeks(1);
        assert_eq!(relative_time_span(base(), same_year), "Sep 13");

        let next_year = at(2018, 1, 2, 0, 0, 0);
        assert_eq!(relative_time_span(base(), next_year), "Sep 13, 2017");
    }

    #[test]
    fn future_timestamps_read_forward() {
        let now = base() - TimeDelta::minutes(42);
        assert_eq!(relative_time_span(base(), now), "in 42 minutes");

        let now = base() - TimeDelta::hours(3);
        assert_eq!(relative_time_span(base(), now), "in 3 hours");

        let now = base() - TimeDelta::seconds(10);
        assert_eq!(relative_time_span(base(), now), "in 0 minutes");
    }

    #[test]
    fn formatting_is_idempotent() {
        let now = base() + TimeDelta::hours(5);
        let first = format_relative("2017-09-13T18:04:29Z", now).unwrap();
        let second = format_relative("2017-09-13T18:04:29Z", now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_input_is_an_error() {
        for bad in ["", "yesterday", "2017-09-13 18:04:29", "2017-09-13T18:04:29+01:00"] {
            let err = format_relative(bad, base()).unwrap_err();
            let TimeError::Malformed { input, .. } = &err;
            assert_eq!(input, bad);
            assert!(err.to_string().contains("does not match"));
        }
    }
}
