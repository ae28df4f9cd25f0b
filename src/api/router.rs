use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, enqueue_loan_notification, enqueue_overdue_sweep};

/// Creates the admin router for the notification jobs
///
/// - GET /health - Liveness check
/// - POST /loans/:id/notifications - Queue a loan confirmation email
/// - POST /sweeps/overdue - Queue an overdue sweep outside the schedule
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/loans/:id/notifications", post(enqueue_loan_notification))
        .route("/sweeps/overdue", post(enqueue_overdue_sweep))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
