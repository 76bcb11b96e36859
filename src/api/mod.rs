//! HTTP API module
//! 
//! This module contains the timer command endpoints, read-only views of the
//! timer, and the settings endpoints.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/restart", post(restart_handler))
        .route("/add-time", post(add_time_handler))
        .route("/set-time", post(set_time_handler))
        .route("/reset", post(reset_handler))
        .route("/state", get(state_handler))
        .route("/display", get(display_handler))
        .route("/status", get(status_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
