//! Table rows for the recent-alerts list and the user roster.
//!
//! These are plain view models: every field is already the string the table
//! cell shows, so templating stays a dumb projection.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::model::{AlertRecord, GeoPoint, UserRecord};
use crate::relative_time::format_relative;
use crate::timestamp::normalize_in;

/// Maximum number of rows in the recent-alerts table.
pub const RECENT_ALERT_LIMIT: usize = 10;

/// One row of the recent-alerts table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRow {
    pub alert_id: String,
    pub user_name: String,
    /// Uppercase first character of `user_name`, shown in the avatar.
    pub initial: String,
    pub location: String,
    pub time: String,
    pub status: &'static str,
    pub status_class: &'static str,
}

/// One row of the user roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    pub user_id: String,
    pub initial: String,
    pub display_name: String,
    pub email: String,
    pub contact_number: String,
    pub auth_phone: String,
    pub verified: bool,
    pub verified_label: &'static str,
    pub last_sign_in: String,
}

/// Rows for the first [`RECENT_ALERT_LIMIT`] alerts, in feed order.
pub fn recent_alert_rows<Tz>(
    alerts: &[AlertRecord],
    users: &[UserRecord],
    now: &DateTime<Tz>,
) -> Vec<AlertRow>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    alerts
        .iter()
        .take(RECENT_ALERT_LIMIT)
        .map(|alert| {
            let user_name = users
                .iter()
                .find(|u| u.id == alert.user_id)
                .and_then(|u| non_empty(u.display_name.as_deref()))
                .unwrap_or("Unknown User")
                .to_string();

            AlertRow {
                alert_id: alert.id.clone(),
                initial: initial_of(&user_name),
                location: alert
                    .location
                    .map(format_location)
                    .unwrap_or_else(|| "Unknown".to_string()),
                time: format_relative(alert.instant_in(&now.timezone()), now),
                status: alert.status.label(),
                status_class: alert.status.css_class(),
                user_name,
            }
        })
        .collect()
}

/// Rows for every user, in feed order.
pub fn user_rows<Tz>(users: &[UserRecord], now: &DateTime<Tz>) -> Vec<UserRow>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    users
        .iter()
        .map(|user| {
            let display_name = non_empty(user.display_name.as_deref());
            let email = non_empty(user.email.as_deref());

            UserRow {
                user_id: user.id.clone(),
                initial: initial_of(display_name.or(email).unwrap_or("U")),
                display_name: display_name.unwrap_or("Unknown").to_string(),
                email: email.unwrap_or("N/A").to_string(),
                contact_number: non_empty(user.contact_phone_number.as_deref())
                    .unwrap_or("Not set")
                    .to_string(),
                auth_phone: non_empty(user.phone_number.as_deref())
                    .unwrap_or("Not set")
                    .to_string(),
                verified: user.phone_verified,
                verified_label: if user.phone_verified {
                    "✓ Verified"
                } else {
                    "✗ Unverified"
                },
                last_sign_in: match user.last_sign_in.as_ref() {
                    Some(raw) => {
                        format_relative(normalize_in(Some(raw), &now.timezone()), now)
                    }
                    None => "Never".to_string(),
                },
            }
        })
        .collect()
}

fn format_location(point: GeoPoint) -> String {
    format!("{:.4}, {:.4}", point.latitude, point.longitude)
}

fn initial_of(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "U".to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
