//! Route table

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::server::handlers::{analytics, ask, status};
use crate::startup::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/status", get(status::status))
    .route("/version", get(status::version))
    .route("/analytics", post(analytics::analytics))
    .route("/ask", post(ask::ask))
    .with_state(state)
}
