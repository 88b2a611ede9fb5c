//! SOS Console - the activity panel behind the SOS alerting operator console.
//!
//! # Overview
//!
//! The console shows operators a user roster, the most recent SOS alerts and
//! a rolling 7-day histogram of alert activity. Records arrive from the
//! realtime feed as in-memory snapshots; this crate turns them into pixels
//! and table text.
//!
//! The core is deliberately free of clocks and I/O: every function that
//! depends on the current time takes `now` as an argument, and the chart is
//! drawn through the [`chart::surface::Surface`] trait.
//!
//! # Modules
//!
//! - [`timestamp`]: Normalization of the feed's timestamp shapes
//! - [`aggregation`]: Calendar-day bucketing into the 7-day window
//! - [`chart`]: Chart geometry, renderer and surfaces
//! - [`relative_time`]: "5 mins ago" cell text
//! - [`rows`]: Alert and roster table rows
//! - [`panel`]: Snapshot state and the chart controller
//! - [`model`]: Record and response types
//! - [`config`]: Environment configuration
//! - [`api`]: HTTP API handlers

pub mod aggregation;
pub mod api;
pub mod chart;
pub mod config;
pub mod model;
pub mod panel;
pub mod relative_time;
pub mod rows;
pub mod timestamp;
