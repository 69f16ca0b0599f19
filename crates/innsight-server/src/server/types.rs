//! REST API request and response types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use innsight_core::analytics::AnalyticsSnapshot;
use innsight_core::index::ScoredPassage;

/// Envelope every endpoint responds with
///
/// `transaction_id` correlates a response with the server-side log lines it
/// produced. `errors` is empty on success and `data` flattens into the body.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BaseResponse<T> {
  pub transaction_id: Uuid,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub errors: Vec<ApiError>,
  #[serde(flatten)]
  pub data: T,
}

impl<T> BaseResponse<T> {
  pub fn success(data: T, transaction_id: Uuid) -> Self {
    Self { transaction_id, errors: Vec::new(), data }
  }
}

impl BaseResponse<()> {
  pub fn error(errors: Vec<ApiError>, transaction_id: Uuid) -> Self {
    Self { transaction_id, errors, data: () }
  }
}

/// A stable machine key plus a human-readable message
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
  pub key: String,
  pub message: String,
}

impl ApiError {
  pub fn new(key: &str, message: &str) -> Self {
    Self { key: key.to_string(), message: message.to_string() }
  }
}

/// Response for GET /status
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct StatusResponse {
  pub status: String,
  pub version: String,
  pub bookings: u64,
  pub passages_indexed: usize,
  pub index_path: String,
}

/// Response for GET /version
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct VersionResponse {
  pub version: String,
}

/// Response for POST /analytics
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyticsResponse {
  pub snapshot: AnalyticsSnapshot,
}

/// Request for POST /ask
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AskRequest {
  pub question: String,
  /// Include the retrieved passages that grounded the answer
  #[serde(default)]
  pub include_sources: bool,
}

/// One grounding passage returned alongside an answer
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SourcePassage {
  pub content: String,
  pub category: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub month: Option<String>,
  pub score: f32,
}

impl From<&ScoredPassage> for SourcePassage {
  fn from(scored: &ScoredPassage) -> Self {
    Self {
      content: scored.passage.content.clone(),
      category: scored.passage.category.as_str().to_string(),
      month: scored.passage.month.clone(),
      score: scored.score,
    }
  }
}

/// Response for POST /ask
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AskResponse {
  pub answer: String,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub sources: Vec<SourcePassage>,
}
