//! Data models for the SOS console.
//!
//! Records arrive from the realtime feed already fetched and are treated as
//! read-only: the core never mutates or retains them beyond a single pass.
//! Field names follow the feed's camelCase JSON.

use chrono::TimeZone;
use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp::{Instant, RawTimestamp, normalize, normalize_in};

/// A geographic position attached to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolution state of an SOS alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// The alert is open and awaiting response.
    #[default]
    Active,

    /// An operator or the user has closed the alert.
    Resolved,
}

impl AlertStatus {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            AlertStatus::Active => "Active",
            AlertStatus::Resolved => "Resolved",
        }
    }

    /// CSS class used by the alerts table badge.
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertStatus::Active => "status-active",
            AlertStatus::Resolved => "status-resolved",
        }
    }

    /// Read a feed status leniently: anything other than `"resolved"`,
    /// including `null` and unknown strings, is active.
    fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value.as_ref().and_then(|v| v.as_str()) {
            Some("resolved") => AlertStatus::Resolved,
            _ => AlertStatus::Active,
        })
    }
}

/// A single user-originated SOS alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: String,

    /// The user who raised the alert.
    pub user_id: String,

    /// Where the alert was raised, when the device reported a fix.
    #[serde(default)]
    pub location: Option<GeoPoint>,

    /// When the alert was raised, in whatever shape the producer wrote it.
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,

    #[serde(default, deserialize_with = "AlertStatus::deserialize_lenient")]
    pub status: AlertStatus,
}

impl AlertRecord {
    /// The normalized alert time, if the record carries one. Offset-less
    /// date-times are read as UTC.
    pub fn instant(&self) -> Option<Instant> {
        normalize(self.timestamp.as_ref())
    }

    /// The normalized alert time, with offset-less date-times read as wall
    /// time in `zone`.
    pub fn instant_in<Tz: TimeZone>(&self, zone: &Tz) -> Option<Instant> {
        normalize_in(self.timestamp.as_ref(), zone)
    }
}

/// A registered user of the alerting app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Emergency contact number set in the app profile.
    #[serde(default)]
    pub contact_phone_number: Option<String>,

    /// Phone number used for sign-in.
    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub phone_verified: bool,

    #[serde(default)]
    pub last_sign_in: Option<RawTimestamp>,
}

/// Response for PUT /alerts and PUT /users.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotAccepted {
    /// Number of records now held by the panel.
    pub count: usize,
}

/// Response for GET /activity.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    /// Axis labels, index-aligned with `counts`.
    pub labels: Vec<&'static str>,

    /// Alerts per day, oldest first; the last entry is today.
    pub counts: Vec<u32>,

    /// Largest count, floored at 1.
    pub max_value: u32,

    /// Records skipped because their timestamp was absent or unparseable.
    pub skipped_unknown: usize,

    /// Records whose day fell outside the 7-day window.
    pub out_of_window: usize,
}

/// Query parameters for GET /activity/chart.png.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Surface width in pixels (default: configured chart width).
    pub width: Option<u32>,

    /// Surface height in pixels (default: configured chart height).
    pub height: Option<u32>,
}
