//! # Rota Rust Backend
//!
//! Volunteer scheduling engine for recurring team rosters.
//!
//! This crate provides a Rust backend for generating and managing monthly
//! volunteer schedules: it expands recurring events into concrete slots,
//! rotates serving teams week by week, auto-fills slots with a load-balancing
//! greedy assigner, and merges generation runs into a saved schedule per
//! month. The backend exposes a REST API via Axum for the web frontend and
//! can notify volunteers of their assignments by email or WhatsApp.
//!
//! ## Features
//!
//! - **Roster Directory**: Volunteers, events, teams, and areas of service
//! - **Team Rotation**: Round-robin weekly team assignments per month
//! - **Slot Expansion**: Turn weekly and one-off events into dated slots
//! - **Auto-Fill**: Greedy least-loaded assignment honoring qualifications,
//!   team membership, and weekday availability
//! - **Schedule Storage**: One saved schedule per month with area-scoped
//!   merge semantics
//! - **Notifications**: Per-volunteer assignment digests over email or
//!   WhatsApp
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types shared across layers
//! - [`scheduler`]: Pure scheduling algorithms (rotation, expansion,
//!   auto-fill, merge)
//! - [`db`]: Repository pattern and persistence layer
//! - [`services`]: High-level operations combining scheduler and storage
//! - [`notify`]: Message rendering and delivery transports
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod db;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
