pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/parse", post(handlers::handle_parse))
        .route(
            "/api/v1/resumes/parse/csv",
            post(handlers::handle_export_csv),
        )
        .route(
            "/api/v1/resumes/parse/json",
            post(handlers::handle_export_json),
        )
        // Uploads are not size-limited.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
