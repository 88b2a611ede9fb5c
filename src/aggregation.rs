//! Rolling 7-day alert histogram.
//!
//! Alerts are grouped by the calendar day they fall on in the caller's time
//! zone. The window always ends on the day containing `now`; the caller
//! supplies `now`, so the same records and the same `now` always produce the
//! same histogram.

use std::ops::Index;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::model::AlertRecord;

/// Number of daily buckets in the activity window.
pub const WINDOW_DAYS: usize = 7;

/// Daily alert counts, oldest first.
///
/// Index 0 is six days before today; index 6 is today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BucketVector([u32; WINDOW_DAYS]);

impl BucketVector {
    pub fn new(counts: [u32; WINDOW_DAYS]) -> Self {
        Self(counts)
    }

    pub fn counts(&self) -> &[u32; WINDOW_DAYS] {
        &self.0
    }

    /// Largest count, floored at 1 so it can always be used as a divisor.
    pub fn max_value(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0).max(1)
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl Index<usize> for BucketVector {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.0[index]
    }
}

/// Histogram plus the records that did not land in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub buckets: BucketVector,

    /// Records with an absent or unparseable timestamp.
    pub skipped_unknown: usize,

    /// Records dated in the future or more than six days before today.
    pub out_of_window: usize,
}

/// Count alerts per calendar day over the 7 days ending on `now`'s date.
///
/// Records without a usable timestamp, and records outside the window, are
/// left out without comment.
pub fn aggregate<Tz: TimeZone>(records: &[AlertRecord], now: &DateTime<Tz>) -> BucketVector {
    aggregate_detailed(records, now).buckets
}

/// Same as [`aggregate`], but also reports how many records were left out.
pub fn aggregate_detailed<Tz: TimeZone>(
    records: &[AlertRecord],
    now: &DateTime<Tz>,
) -> Aggregation {
    let zone = now.timezone();
    let today = now.date_naive();

    let mut counts = [0u32; WINDOW_DAYS];
    let mut skipped_unknown = 0;
    let mut out_of_window = 0;

    for record in records {
        let Some(alert_time) = record.instant_in(&zone).and_then(|i| i.as_datetime()) else {
            skipped_unknown += 1;
            continue;
        };

        let alert_day = alert_time.with_timezone(&zone).date_naive();
        let diff_days = (today - alert_day).num_days();

        match usize::try_from(diff_days) {
            Ok(diff) if diff < WINDOW_DAYS => counts[WINDOW_DAYS - 1 - diff] += 1,
            _ => out_of_window += 1,
        }
    }

    Aggregation {
        buckets: BucketVector(counts),
        skipped_unknown,
        out_of_window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::{RawTimestamp, StoreTimestamp};
    use chrono::{Duration, FixedOffset, Utc};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    fn local(
        zone: &FixedOffset,
        y: i32,
        m: u32,
        d: u32,
        h: u32,
        min: u32,
    ) -> DateTime<FixedOffset> {
        zone.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn alert_at(id: &str, timestamp: Option<RawTimestamp>) -> AlertRecord {
        AlertRecord {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            location: None,
            timestamp,
            status: Default::default(),
        }
    }

    fn alert_on<Tz: TimeZone>(id: &str, when: DateTime<Tz>) -> AlertRecord
    where
        Tz::Offset: std::fmt::Display,
    {
        alert_at(id, Some(RawTimestamp::text(when.to_rfc3339())))
    }

    #[test]
    fn test_empty_records() {
        let now = Utc::now();
        let buckets = aggregate(&[], &now);
        assert_eq!(buckets.counts(), &[0; 7]);
        assert_eq!(buckets.max_value(), 1);
    }

    #[test]
    fn test_week_scenario() {
        let zone = ist();
        let now = local(&zone, 2024, 6, 10, 12, 0);
        let records = vec![
            alert_on("today", local(&zone, 2024, 6, 10, 9, 0)),
            alert_on("two-days", local(&zone, 2024, 6, 8, 23, 0)),
            alert_on("old", local(&zone, 2024, 5, 20, 0, 0)),
        ];

        let result = aggregate_detailed(&records, &now);

        assert_eq!(result.buckets.counts(), &[0, 0, 0, 0, 1, 0, 1]);
        assert_eq!(result.out_of_window, 1);
        assert_eq!(result.skipped_unknown, 0);
    }

    #[test]
    fn test_week_scenario_with_offsetless_strings() {
        let now = local(&ist(), 2024, 6, 10, 12, 0);
        let records = vec![
            alert_at("today", Some(RawTimestamp::text("2024-06-10T09:00"))),
            alert_at("two-days", Some(RawTimestamp::text("2024-06-08T23:00"))),
            alert_at("old", Some(RawTimestamp::text("2024-05-20T00:00"))),
        ];

        let result = aggregate_detailed(&records, &now);

        assert_eq!(result.buckets.counts(), &[0, 0, 0, 0, 1, 0, 1]);
        assert_eq!(result.out_of_window, 1);
    }

    #[test]
    fn test_window_boundaries() {
        let zone = ist();
        let now = local(&zone, 2024, 6, 10, 0, 30);
        let records = vec![
            alert_on("today-start", local(&zone, 2024, 6, 10, 0, 0)),
            alert_on("six-days", local(&zone, 2024, 6, 4, 0, 0)),
            alert_on("six-days-late", local(&zone, 2024, 6, 4, 23, 59)),
            alert_on("seven-days", local(&zone, 2024, 6, 3, 23, 59)),
            alert_on("tomorrow", local(&zone, 2024, 6, 11, 0, 0)),
            alert_on("later-today", local(&zone, 2024, 6, 10, 23, 59)),
        ];

        let result = aggregate_detailed(&records, &now);

        assert_eq!(result.buckets.counts(), &[2, 0, 0, 0, 0, 0, 2]);
        assert_eq!(result.out_of_window, 2);
    }

    #[test]
    fn test_days_follow_the_callers_zone() {
        // 20:00 UTC on June 9 is already June 10 in IST.
        let zone = ist();
        let now = local(&zone, 2024, 6, 10, 12, 0);
        let utc_evening = Utc.with_ymd_and_hms(2024, 6, 9, 20, 0, 0).unwrap();
        let records = vec![alert_on("evening", utc_evening)];

        assert_eq!(aggregate(&records, &now)[6], 1);

        let utc_now = now.with_timezone(&Utc);
        assert_eq!(aggregate(&records, &utc_now)[5], 1);
    }

    #[test]
    fn test_absent_and_invalid_timestamps_are_skipped() {
        let zone = ist();
        let now = local(&zone, 2024, 6, 10, 12, 0);
        let real = vec![
            alert_on("a", local(&zone, 2024, 6, 10, 8, 0)),
            alert_on("b", local(&zone, 2024, 6, 7, 8, 0)),
        ];

        let mut mixed = real.clone();
        mixed.push(alert_at("none-1", None));
        mixed.push(alert_at("none-2", None));
        mixed.push(alert_at("garbage", Some(RawTimestamp::text("soon"))));

        let result = aggregate_detailed(&mixed, &now);

        assert_eq!(result.buckets, aggregate(&real, &now));
        assert_eq!(result.skipped_unknown, 3);
        assert_eq!(result.out_of_window, 0);
    }

    #[test]
    fn test_mixed_timestamp_shapes() {
        let now = Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap();
        let records = vec![
            alert_at(
                "store",
                Some(RawTimestamp::from(StoreTimestamp {
                    seconds: 1_704_067_200,
                    nanoseconds: 0,
                })),
            ),
            alert_at("seconds", Some(RawTimestamp::seconds(1_704_067_200.0))),
            alert_at("iso", Some(RawTimestamp::text("2024-01-01T00:00:00Z"))),
            alert_at("millis", Some(RawTimestamp::millis(1_704_240_000_000.0))),
        ];

        let buckets = aggregate(&records, &now);

        // Jan 1 is two days before Jan 3; the millis value is Jan 3 00:00 UTC.
        assert_eq!(buckets.counts(), &[0, 0, 0, 0, 3, 0, 1]);
        assert_eq!(buckets.total(), 4);
    }

    #[test]
    fn test_recomputed_from_scratch() {
        let now = Utc::now();
        let records = vec![alert_on("a", now - Duration::hours(1))];

        let first = aggregate(&records, &now);
        let second = aggregate(&records, &now);

        assert_eq!(first, second);
        assert_eq!(first.total(), 1);
    }

    #[test]
    fn test_max_value_floor() {
        assert_eq!(BucketVector::new([0; 7]).max_value(), 1);
        assert_eq!(BucketVector::new([0, 3, 0, 9, 0, 0, 2]).max_value(), 9);
    }
}
