//! Liveness and version endpoints

use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::server::types::{BaseResponse, StatusResponse, VersionResponse};
use crate::startup::AppState;

/// GET /status - Readiness plus headline snapshot figures
pub async fn status(State(state): State<Arc<AppState>>) -> Json<BaseResponse<StatusResponse>> {
  let status = StatusResponse {
    status: (if state.engine.is_ready() { "ready" } else { "initializing" }).to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    bookings: state.snapshot.summary.total_bookings,
    passages_indexed: state.passages_indexed,
    index_path: state.index_path.display().to_string(),
  };

  Json(BaseResponse::success(status, Uuid::new_v4()))
}

/// GET /version - Crate version only
pub async fn version() -> Json<BaseResponse<VersionResponse>> {
  let version = VersionResponse { version: env!("CARGO_PKG_VERSION").to_string() };
  Json(BaseResponse::success(version, Uuid::new_v4()))
}
