//! Timestamp normalization.
//!
//! Alert and user records reach the console with timestamps in whatever shape
//! the producer happened to use: document-store timestamp objects, bare
//! `{ "seconds": ... }` objects, ISO strings or epoch milliseconds. This module
//! folds all of them into a single [`Instant`].
//!
//! Normalization never fails. An absent timestamp stays absent, and a value
//! that cannot be parsed becomes [`Instant::Invalid`]; consumers decide what
//! to do with either.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A canonical point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Instant {
    /// A representable UTC date-time.
    Valid(DateTime<Utc>),

    /// The result of a permissive parse that produced no usable date.
    Invalid,
}

impl Instant {
    /// Build an instant from (possibly fractional) milliseconds since the epoch.
    ///
    /// Non-finite or out-of-range values yield [`Instant::Invalid`].
    pub fn from_epoch_millis(millis: f64) -> Self {
        if !millis.is_finite() {
            return Instant::Invalid;
        }

        let whole = millis.trunc();
        if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
            return Instant::Invalid;
        }

        DateTime::from_timestamp_millis(whole as i64)
            .map(Instant::Valid)
            .unwrap_or(Instant::Invalid)
    }

    /// The date-time, if this instant is valid.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Instant::Valid(dt) => Some(*dt),
            Instant::Invalid => None,
        }
    }

    /// Milliseconds since the epoch, if this instant is valid.
    pub fn epoch_millis(&self) -> Option<i64> {
        self.as_datetime().map(|dt| dt.timestamp_millis())
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(dt: DateTime<Utc>) -> Self {
        Instant::Valid(dt)
    }
}

/// Values that know how to turn themselves into an [`Instant`].
pub trait ToInstant {
    fn to_instant(&self) -> Instant;
}

/// Document-store timestamp: whole seconds plus a nanosecond remainder.
///
/// Accepts both the `seconds`/`nanoseconds` field names and the underscored
/// `_seconds`/`_nanoseconds` form produced by admin SDK exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTimestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,

    #[serde(alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl ToInstant for StoreTimestamp {
    fn to_instant(&self) -> Instant {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
            .map(Instant::Valid)
            .unwrap_or(Instant::Invalid)
    }
}

impl<Tz: TimeZone> ToInstant for DateTime<Tz> {
    fn to_instant(&self) -> Instant {
        Instant::Valid(self.with_timezone(&Utc))
    }
}

/// A bare `{ "seconds": n }` object, possibly fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochSeconds {
    pub seconds: f64,
}

/// Anything handed to the generic date parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueValue {
    /// A date string (ISO 8601, RFC 3339, RFC 2822).
    Text(String),

    /// Milliseconds since the epoch.
    Millis(f64),

    /// Any other JSON value. Always parses to [`Instant::Invalid`].
    Other(serde_json::Value),
}

/// A timestamp as it arrives from the data feed.
///
/// Variant order is the detection order: when decoding JSON, a value that
/// carries both `seconds` and `nanoseconds` is a [`StoreTimestamp`] even
/// though it would also satisfy [`EpochSeconds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Convertible(StoreTimestamp),
    EpochSeconds(EpochSeconds),
    Opaque(OpaqueValue),
}

impl RawTimestamp {
    pub fn text(value: impl Into<String>) -> Self {
        RawTimestamp::Opaque(OpaqueValue::Text(value.into()))
    }

    pub fn millis(value: f64) -> Self {
        RawTimestamp::Opaque(OpaqueValue::Millis(value))
    }

    pub fn seconds(value: f64) -> Self {
        RawTimestamp::EpochSeconds(EpochSeconds { seconds: value })
    }
}

impl From<StoreTimestamp> for RawTimestamp {
    fn from(ts: StoreTimestamp) -> Self {
        RawTimestamp::Convertible(ts)
    }
}

/// Normalize a raw timestamp, reading offset-less date-times as UTC.
///
/// Tries, in order: the value's own conversion, epoch seconds, the generic
/// parser. Absent input stays absent; unparseable input becomes
/// [`Instant::Invalid`].
pub fn normalize(raw: Option<&RawTimestamp>) -> Option<Instant> {
    normalize_in(raw, &Utc)
}

/// Normalize a raw timestamp, reading offset-less date-times as wall time in
/// `zone`.
///
/// A wall time that occurs twice in `zone` resolves to the earlier instant;
/// one that falls in a gap is [`Instant::Invalid`].
pub fn normalize_in<Tz: TimeZone>(raw: Option<&RawTimestamp>, zone: &Tz) -> Option<Instant> {
    let instant = match raw? {
        RawTimestamp::Convertible(ts) => ts.to_instant(),
        RawTimestamp::EpochSeconds(epoch) => Instant::from_epoch_millis(epoch.seconds * 1000.0),
        RawTimestamp::Opaque(value) => parse_opaque_in(value, zone),
    };

    Some(instant)
}

/// Generic, permissive date parsing, with offset-less date-times read as UTC.
pub fn parse_opaque(value: &OpaqueValue) -> Instant {
    parse_opaque_in(value, &Utc)
}

/// Generic, permissive date parsing, with offset-less date-times read in `zone`.
pub fn parse_opaque_in<Tz: TimeZone>(value: &OpaqueValue, zone: &Tz) -> Instant {
    match value {
        OpaqueValue::Text(text) => parse_date_text(text, zone),
        OpaqueValue::Millis(millis) => Instant::from_epoch_millis(*millis),
        OpaqueValue::Other(_) => Instant::Invalid,
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

fn parse_date_text<Tz: TimeZone>(text: &str, zone: &Tz) -> Instant {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return dt.to_instant();
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return zone
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.to_instant())
                .unwrap_or(Instant::Invalid);
        }
    }

    // Date-only strings are midnight UTC regardless of zone.
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Instant::Valid(naive.and_utc()))
            .unwrap_or(Instant::Invalid);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return dt.to_instant();
    }

    Instant::Invalid
}
