//! Human-readable age labels for logged entries.
//!
//! # Invariants
//! - Output depends only on `(timestamp, now)`; no clock is read here.
//! - Units are floor divisions of the millisecond difference.
//! - Timestamps in the future of `now` read as "Just now".

use chrono::{DateTime, Datelike, FixedOffset};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Formats how long ago `timestamp` was, as seen at `now`.
///
/// Under a week the label counts whole minutes, hours or days. From a week
/// on it is the en-US short date of `timestamp` ("Mar 5") in `now`'s offset,
/// with the year appended ("Mar 5, 2024") when it differs from the year of
/// `now`.
pub fn format_relative(timestamp: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> String {
    let diff_ms = now.signed_duration_since(timestamp).num_milliseconds();
    let minutes = diff_ms.div_euclid(MS_PER_MINUTE);
    let hours = diff_ms.div_euclid(MS_PER_HOUR);
    let days = diff_ms.div_euclid(MS_PER_DAY);

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        units_ago(minutes, "minute")
    } else if hours < 24 {
        units_ago(hours, "hour")
    } else if days < 7 {
        units_ago(days, "day")
    } else {
        short_date(timestamp, now)
    }
}

fn units_ago(count: i64, unit: &str) -> String {
    let suffix = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{suffix} ago")
}

/// Date of `timestamp` as seen in the viewer's offset, i.e. `now`'s.
fn short_date(timestamp: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> String {
    let local = timestamp.with_timezone(&now.timezone());
    if local.year() != now.year() {
        local.format("%b %-d, %Y").to_string()
    } else {
        local.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::format_relative;
    use chrono::{DateTime, Duration, FixedOffset};

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).expect("valid rfc3339")
    }

    #[test]
    fn same_instant_is_just_now() {
        let t = at("2026-05-10T12:00:00+00:00");
        assert_eq!(format_relative(t, t), "Just now");
        assert_eq!(format_relative(t, t + Duration::seconds(59)), "Just now");
    }

    #[test]
    fn future_timestamp_is_just_now() {
        let t = at("2026-05-10T12:00:00+00:00");
        assert_eq!(format_relative(t, t - Duration::hours(3)), "Just now");
    }

    #[test]
    fn minutes_are_floored_and_pluralized() {
        let t = at("2026-05-10T12:00:00+00:00");
        assert_eq!(format_relative(t, t + Duration::seconds(90)), "1 minute ago");
        assert_eq!(format_relative(t, t + Duration::seconds(120)), "2 minutes ago");
        assert_eq!(
            format_relative(t, t + Duration::seconds(3599)),
            "59 minutes ago"
        );
    }

    #[test]
    fn hours_are_floored_and_pluralized() {
        let t = at("2026-05-10T12:00:00+00:00");
        assert_eq!(format_relative(t, t + Duration::seconds(3700)), "1 hour ago");
        assert_eq!(format_relative(t, t + Duration::hours(23)), "23 hours ago");
    }

    #[test]
    fn days_under_a_week() {
        let t = at("2026-05-10T12:00:00+00:00");
        assert_eq!(format_relative(t, t + Duration::hours(24)), "1 day ago");
        assert_eq!(
            format_relative(t, t + Duration::days(6) + Duration::hours(23)),
            "6 days ago"
        );
    }

    #[test]
    fn a_week_or_more_shows_short_date() {
        let t = at("2026-05-01T12:00:00+00:00");
        assert_eq!(format_relative(t, t + Duration::days(7)), "May 1");
        assert_eq!(format_relative(t, t + Duration::days(9)), "May 1");
    }

    #[test]
    fn short_date_includes_year_when_years_differ() {
        let t = at("2025-12-20T09:00:00+00:00");
        assert_eq!(format_relative(t, t + Duration::days(20)), "Dec 20, 2025");
    }

    #[test]
    fn short_date_uses_the_viewer_offset() {
        let logged = at("2026-01-01T01:00:00+03:00");
        let now = at("2026-01-10T12:00:00+00:00");
        assert_eq!(format_relative(logged, now), "Dec 31, 2025");

        let logged = at("2026-03-01T23:30:00-05:00");
        let now = at("2026-03-12T09:00:00+09:00");
        assert_eq!(format_relative(logged, now), "Mar 2");
    }
}
