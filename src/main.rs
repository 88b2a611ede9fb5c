//! SOS Console - activity panel service for the SOS alerting operator console.
//!
//! # API Endpoints
//!
//! - `PUT /alerts` - Replace the alert snapshot
//! - `PUT /users` - Replace the user snapshot
//! - `GET /activity` - 7-day alert histogram
//! - `GET /activity/chart.png` - Histogram rendered as PNG
//! - `GET /alerts/recent` - Recent alert rows
//! - `GET /users` - User roster rows
//! - `GET /health` - Health check

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sos_console::api::{AppState, router};
use sos_console::config::ConsoleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("sos_console=info".parse()?))
        .init();

    // Load configuration from environment
    let config = ConsoleConfig::from_env()?;

    info!(
        port = config.port,
        chart_width = config.chart_width,
        chart_height = config.chart_height,
        "Starting SOS console"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config);

    let app = router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // Start server
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "SOS console is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
