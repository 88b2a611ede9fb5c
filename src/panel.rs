//! Panel state and the chart controller.
//!
//! [`PanelState`] is the single owner of the record snapshots. Snapshots are
//! replaced wholesale whenever the feed pushes an update; readers derive
//! everything (histogram, table rows) from the current snapshot plus an
//! explicit `now`.
//!
//! [`ActivityChart`] owns a render surface and re-draws it on the two
//! notifications the panel reacts to: data changed and surface resized.

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::aggregation::{Aggregation, aggregate_detailed};
use crate::chart::surface::ResizableSurface;
use crate::chart::{ChartStyle, DAY_LABELS, render_with_style};
use crate::model::{ActivityResponse, AlertRecord, UserRecord};
use crate::rows::{AlertRow, UserRow, recent_alert_rows, user_rows};

/// Current alert and user snapshots.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    alerts: Vec<AlertRecord>,
    users: Vec<UserRecord>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the alert snapshot. Feed order is preserved.
    pub fn replace_alerts(&mut self, alerts: Vec<AlertRecord>) {
        self.alerts = alerts;
    }

    /// Replace the user snapshot.
    pub fn replace_users(&mut self, users: Vec<UserRecord>) {
        self.users = users;
    }

    pub fn alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn activity<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Aggregation {
        aggregate_detailed(&self.alerts, now)
    }

    pub fn activity_response<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ActivityResponse {
        let activity = self.activity(now);
        ActivityResponse {
            labels: DAY_LABELS.to_vec(),
            counts: activity.buckets.counts().to_vec(),
            max_value: activity.buckets.max_value(),
            skipped_unknown: activity.skipped_unknown,
            out_of_window: activity.out_of_window,
        }
    }

    pub fn recent_alert_rows<Tz>(&self, now: &DateTime<Tz>) -> Vec<AlertRow>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        recent_alert_rows(&self.alerts, &self.users, now)
    }

    pub fn user_rows<Tz>(&self, now: &DateTime<Tz>) -> Vec<UserRow>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        user_rows(&self.users, now)
    }
}

/// Keeps a surface in sync with the panel's alert snapshot.
///
/// The surface is optional: until one is attached, notifications only
/// aggregate. Every redraw aggregates from scratch with the `now` passed in,
/// and the renderer always clears before drawing.
#[derive(Debug)]
pub struct ActivityChart<S> {
    surface: Option<S>,
    style: ChartStyle,
}

impl<S> Default for ActivityChart<S> {
    fn default() -> Self {
        Self {
            surface: None,
            style: ChartStyle::default(),
        }
    }
}

impl<S: ResizableSurface> ActivityChart<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface: Some(surface),
            style: ChartStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    pub fn detach(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// The alert snapshot changed: redraw at the current surface size.
    pub fn on_data_changed<Tz: TimeZone>(
        &mut self,
        state: &PanelState,
        now: &DateTime<Tz>,
    ) -> Aggregation {
        self.redraw(state, now)
    }

    /// The surface was resized: reallocate it, then redraw.
    pub fn on_resize<Tz: TimeZone>(
        &mut self,
        width: u32,
        height: u32,
        state: &PanelState,
        now: &DateTime<Tz>,
    ) -> Aggregation {
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(width, height);
        }
        self.redraw(state, now)
    }

    fn redraw<Tz: TimeZone>(&mut self, state: &PanelState, now: &DateTime<Tz>) -> Aggregation {
        let activity = state.activity(now);

        if activity.skipped_unknown > 0 || activity.out_of_window > 0 {
            debug!(
                skipped_unknown = activity.skipped_unknown,
                out_of_window = activity.out_of_window,
                "Alerts left out of the activity window"
            );
        }

        match self.surface.as_mut() {
            Some(surface) => {
                let (width, height) = surface.size();
                render_with_style(surface, width, height, &activity.buckets, &self.style);
                debug!(width, height, total = activity.buckets.total(), "Activity chart rendered");
            }
            None => debug!("No surface attached; skipping activity chart render"),
        }

        activity
    }
}
