//! Router assembly

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{
    handle_framework, handle_health, handle_list_documents, handle_report, handle_select,
    handle_state, handle_upload,
};
use crate::pages::handle_index;
use crate::state::AppState;

/// All routes with tracing and CORS. Rate limiting is layered on in `main`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Health check
        .route("/health", get(handle_health))
        // Review page
        .route("/", get(handle_index))
        // API endpoints
        .route(
            "/api/documents",
            get(handle_list_documents).post(handle_upload),
        )
        .route("/api/documents/:id/select", post(handle_select))
        .route("/api/state", get(handle_state))
        .route("/api/report", get(handle_report))
        .route("/api/framework", get(handle_framework))
        // Apply middleware
        .layer(upload_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
