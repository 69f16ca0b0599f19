//! Analytics snapshot endpoint

use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;
use uuid::Uuid;

use crate::server::types::{AnalyticsResponse, BaseResponse};
use crate::startup::AppState;

/// POST /analytics - The full snapshot derived at startup
pub async fn analytics(
  State(state): State<Arc<AppState>>,
) -> Json<BaseResponse<AnalyticsResponse>> {
  let response = AnalyticsResponse { snapshot: state.snapshot.as_ref().clone() };
  Json(BaseResponse::success(response, Uuid::new_v4()))
}
