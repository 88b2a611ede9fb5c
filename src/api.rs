//! HTTP API handlers for the SOS console.
//!
//! The console is fed snapshots by the realtime data source and serves the
//! derived views back to the operator UI:
//!
//! - **PUT /alerts**, **PUT /users**: replace the in-memory snapshots.
//! - **GET /activity**: the 7-day histogram as JSON.
//! - **GET /activity/chart.png**: the histogram rendered as a PNG.
//! - **GET /alerts/recent**, **GET /users**: table rows.
//!
//! Handlers log counts and sizes only. Record contents (names, locations)
//! never reach the logs.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, put},
};
use chrono::Local;
use tracing::{info, instrument, warn};

use crate::chart::raster::RasterSurface;
use crate::chart::render;
use crate::config::ConsoleConfig;
use crate::model::{ActivityResponse, AlertRecord, ChartQuery, SnapshotAccepted, UserRecord};
use crate::panel::PanelState;
use crate::rows::{AlertRow, UserRow};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub panel: Arc<Mutex<PanelState>>,
    pub config: Arc<ConsoleConfig>,
}

impl AppState {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            panel: Arc::new(Mutex::new(PanelState::new())),
            config: Arc::new(config),
        }
    }

    fn panel(&self) -> Result<MutexGuard<'_, PanelState>, StatusCode> {
        self.panel.lock().map_err(|_| {
            warn!("Panel state lock poisoned");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

/// Build the console router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/alerts", put(put_alerts))
        .route("/alerts/recent", get(get_recent_alerts))
        .route("/users", put(put_users).get(get_users))
        .route("/activity", get(get_activity))
        .route("/activity/chart.png", get(get_activity_chart))
        .route("/health", get(health_check))
        .with_state(state)
}

/// PUT /alerts - Replace the alert snapshot.
///
/// # Request Body
///
/// ```json
/// [
///     {
///         "id": "a1",
///         "userId": "u1",
///         "location": {"latitude": 12.97, "longitude": 77.59},
///         "timestamp": {"seconds": 1718000000, "nanoseconds": 0},
///         "status": "active"
///     }
/// ]
/// ```
///
/// # Response
///
/// Returns `202 Accepted` with the number of alerts held.
#[instrument(skip(state, alerts), fields(count = alerts.len()))]
pub async fn put_alerts(
    State(state): State<AppState>,
    Json(alerts): Json<Vec<AlertRecord>>,
) -> Result<impl IntoResponse, StatusCode> {
    let count = alerts.len();
    state.panel()?.replace_alerts(alerts);

    info!(count, "Alert snapshot replaced");
    Ok((StatusCode::ACCEPTED, Json(SnapshotAccepted { count })))
}

/// PUT /users - Replace the user snapshot.
#[instrument(skip(state, users), fields(count = users.len()))]
pub async fn put_users(
    State(state): State<AppState>,
    Json(users): Json<Vec<UserRecord>>,
) -> Result<impl IntoResponse, StatusCode> {
    let count = users.len();
    state.panel()?.replace_users(users);

    info!(count, "User snapshot replaced");
    Ok((StatusCode::ACCEPTED, Json(SnapshotAccepted { count })))
}

/// GET /activity - Alerts per day over the last 7 days.
///
/// # Response
///
/// ```json
/// {
///     "labels": ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
///     "counts": [0, 2, 0, 1, 0, 0, 3],
///     "max_value": 3,
///     "skipped_unknown": 0,
///     "out_of_window": 4
/// }
/// ```
#[instrument(skip(state))]
pub async fn get_activity(
    State(state): State<AppState>,
) -> Result<Json<ActivityResponse>, StatusCode> {
    let now = Local::now();
    let response = state.panel()?.activity_response(&now);

    info!(
        total = response.counts.iter().sum::<u32>(),
        skipped_unknown = response.skipped_unknown,
        out_of_window = response.out_of_window,
        "Activity queried"
    );
    Ok(Json(response))
}

/// GET /activity/chart.png - The activity histogram as a PNG image.
///
/// # Query Parameters
///
/// - `width` (optional): image width in pixels (default: configured width)
/// - `height` (optional): image height in pixels (default: configured height)
///
/// Dimensions of zero or above the configured maximum are rejected with
/// `400 Bad Request`.
#[instrument(skip(state))]
pub async fn get_activity_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let width = query.width.unwrap_or(state.config.chart_width);
    let height = query.height.unwrap_or(state.config.chart_height);
    let max = state.config.max_chart_dimension;

    if width == 0 || height == 0 || width > max || height > max {
        warn!(width, height, max, "Rejected chart size");
        return Err(StatusCode::BAD_REQUEST);
    }

    let now = Local::now();
    let buckets = state.panel()?.activity(&now).buckets;

    let mut surface = RasterSurface::new(width, height).map_err(|e| {
        warn!(width, height, error = %e, "Failed to allocate chart surface");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    render(&mut surface, width, height, &buckets);

    let png = surface.encode_png().map_err(|e| {
        warn!(width, height, error = %e, "Failed to encode chart");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!(width, height, bytes = png.len(), "Activity chart rendered");
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// GET /alerts/recent - Rows for the recent alerts table (at most 10).
#[instrument(skip(state))]
pub async fn get_recent_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertRow>>, StatusCode> {
    let now = Local::now();
    let rows = state.panel()?.recent_alert_rows(&now);

    info!(row_count = rows.len(), "Recent alerts queried");
    Ok(Json(rows))
}

/// GET /users - Rows for the user roster.
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<Vec<UserRow>>, StatusCode> {
    let now = Local::now();
    let rows = state.panel()?.user_rows(&now);

    info!(row_count = rows.len(), "User roster queried");
    Ok(Json(rows))
}

/// GET /health - Simple health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
