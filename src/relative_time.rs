//! "5 mins ago"-style cell text for the alert and roster tables.

use chrono::{DateTime, TimeZone};

use crate::timestamp::Instant;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Describe how long before `now` the instant was.
///
/// Instants in the future read as "Just now". Anything a week old or older is
/// shown as an absolute date in the zone of `now`, e.g. `20 May 2024, 09:05 am`.
pub fn format_relative<Tz>(instant: Option<Instant>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let Some(instant) = instant else {
        return "Unknown".to_string();
    };
    let Some(at) = instant.as_datetime() else {
        return "Invalid Date".to_string();
    };

    let elapsed = now.timestamp_millis() - at.timestamp_millis();

    if elapsed < MINUTE_MS {
        "Just now".to_string()
    } else if elapsed < HOUR_MS {
        let mins = elapsed / MINUTE_MS;
        format!("{} min{} ago", mins, plural(mins))
    } else if elapsed < DAY_MS {
        let hours = elapsed / HOUR_MS;
        format!("{} hour{} ago", hours, plural(hours))
    } else if elapsed < WEEK_MS {
        let days = elapsed / DAY_MS;
        format!("{} day{} ago", days, plural(days))
    } else {
        at.with_timezone(&now.timezone())
            .format("%-d %b %Y, %I:%M %P")
            .to_string()
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};

    fn ago(now: DateTime<Utc>, delta: Duration) -> Option<Instant> {
        Some(Instant::Valid(now - delta))
    }

    #[test]
    fn test_unknown_and_invalid() {
        let now = Utc::now();
        assert_eq!(format_relative(None, &now), "Unknown");
        assert_eq!(format_relative(Some(Instant::Invalid), &now), "Invalid Date");
    }

    #[test]
    fn test_relative_ranges() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        assert_eq!(format_relative(ago(now, Duration::seconds(59)), &now), "Just now");
        assert_eq!(format_relative(ago(now, Duration::minutes(1)), &now), "1 min ago");
        assert_eq!(format_relative(ago(now, Duration::minutes(59)), &now), "59 mins ago");
        assert_eq!(format_relative(ago(now, Duration::hours(1)), &now), "1 hour ago");
        assert_eq!(format_relative(ago(now, Duration::hours(23)), &now), "23 hours ago");
        assert_eq!(format_relative(ago(now, Duration::days(1)), &now), "1 day ago");
        assert_eq!(format_relative(ago(now, Duration::days(6)), &now), "6 days ago");
    }

    #[test]
    fn test_future_is_just_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(format_relative(ago(now, Duration::hours(-3)), &now), "Just now");
    }

    #[test]
    fn test_absolute_after_a_week() {
        let zone = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = zone.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 20, 3, 35, 0).unwrap();

        assert_eq!(
            format_relative(Some(Instant::Valid(at)), &now),
            "20 May 2024, 09:05 am"
        );
    }
}
