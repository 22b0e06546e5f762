//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Directory CRUD
        .route("/volunteers", get(handlers::list_volunteers).post(handlers::create_volunteer))
        .route("/volunteers/{id}", put(handlers::update_volunteer).delete(handlers::delete_volunteer))
        .route("/events", get(handlers::list_events).post(handlers::create_event))
        .route("/events/{id}", put(handlers::update_event).delete(handlers::delete_event))
        .route("/teams", get(handlers::list_teams).post(handlers::create_team))
        .route("/teams/{id}", put(handlers::update_team).delete(handlers::delete_team))
        .route("/areas", get(handlers::list_areas).post(handlers::create_area))
        .route("/areas/{id}", put(handlers::update_area).delete(handlers::delete_area))
        // Team rotation
        .route("/rotations/{year}/{month}", get(handlers::get_rotation).post(handlers::generate_rotation))
        // Schedule generation and storage
        .route("/schedules/build", post(handlers::build_schedule))
        .route("/schedules/autofill", post(handlers::auto_fill_schedule))
        .route("/schedules", get(handlers::list_schedules).post(handlers::save_schedule))
        // The router requires one parameter name per position, so {id} doubles
        // as the year segment here. Path extraction is positional.
        .route("/schedules/{id}/{month}", get(handlers::get_schedule_by_period))
        .route("/schedules/{id}", delete(handlers::delete_schedule))
        .route("/schedules/{id}/notify/{channel}", post(handlers::notify_schedule))
        // Permissions and notifier settings
        .route("/permissions", get(handlers::list_permissions).put(handlers::put_permission))
        .route("/permissions/{user_id}", delete(handlers::delete_permission))
        .route("/settings/notifier", get(handlers::get_notifier_settings).put(handlers::put_notifier_settings));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Schedule payloads for a busy month stay well under this.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
