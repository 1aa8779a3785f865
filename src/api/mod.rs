//! HTTP interface for frame analysis and workout sessions.
//!
//! Landmarks are produced by a pose estimator on the client side; the
//! service only counts reps and returns feedback.
//!
//! ## Endpoints
//!
//! - `GET /` - Liveness text
//! - `GET /health` - Service status
//! - `POST /analyze` - Analyze one frame of landmarks
//! - `GET /sessions` - List live sessions
//! - `POST /sessions` - Start a new session
//! - `GET /sessions/:session_id` - Session summary
//! - `POST /sessions/:session_id/reset` - Zero a session's counters
//! - `DELETE /sessions/:session_id` - End a session

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use dto::*;
pub use error::ApiError;
pub use state::AppState;

/// Create the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .route(
            "/sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route(
            "/sessions/:session_id",
            get(handlers::get_session).delete(handlers::end_session),
        )
        .route("/sessions/:session_id/reset", post(handlers::reset_session))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
