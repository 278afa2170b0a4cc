pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume pipeline
        .route("/api/v1/resume", get(handlers::handle_get_resume))
        .route("/api/v1/resume/upload", post(handlers::handle_upload))
        .route("/api/v1/resume/extract", post(handlers::handle_extract))
        .route("/api/v1/resume/compare", post(handlers::handle_compare))
        .route("/api/v1/resume/letter", post(handlers::handle_letter))
        .with_state(state)
}
