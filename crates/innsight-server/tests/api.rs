//! REST API tests exercising the router with injected collaborators

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use innsight_core::analytics::{
  AnalyticsSnapshot, CountryCancellation, LeadTimeCancellation, MonthlyMetric, SummaryStats,
};
use innsight_core::answer::AnswerEngine;
use innsight_core::embedding::HashedBowEmbedder;
use innsight_core::generation::{Generator, MockGenerator};
use innsight_core::index::SemanticIndex;
use innsight_core::passages;

use innsight_server::history::QueryHistory;
use innsight_server::server::routing::create_router;
use innsight_server::startup::AppState;

fn snapshot() -> AnalyticsSnapshot {
  AnalyticsSnapshot {
    summary: SummaryStats {
      total_bookings: 1_200,
      cancellation_rate: 0.25,
      avg_lead_time: 80.5,
    },
    monthly: vec![
      MonthlyMetric { month: "July".to_string(), avg_adr: 126.0, total_revenue: 500_000.0 },
      MonthlyMetric { month: "August".to_string(), avg_adr: 130.0, total_revenue: 600_000.0 },
    ],
    cancellation_by_country: vec![CountryCancellation {
      country: "PRT".to_string(),
      cancellation_rate: 0.56,
    }],
    cancellation_by_lead_time: vec![LeadTimeCancellation {
      bucket: "0-7d".to_string(),
      cancellation_rate: 0.1,
    }],
    top_countries: vec![],
    guest_distribution: vec![],
  }
}

async fn app_state(generator: Arc<dyn Generator>, history_path: Option<&Path>) -> AppState {
  let snapshot = snapshot();
  let passages = passages::synthesize(&snapshot);
  let index = SemanticIndex::build(passages, Arc::new(HashedBowEmbedder::default()))
    .await
    .unwrap();
  let passages_indexed = index.len();

  AppState {
    snapshot: Arc::new(snapshot),
    engine: AnswerEngine::with_index(Arc::new(index), generator),
    history: history_path.map(QueryHistory::new),
    passages_indexed,
    index_path: Path::new("/tmp/index.json").to_path_buf(),
  }
}

async fn body_json(response: axum::response::Response) -> Value {
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

#[tokio::test]
async fn status_reports_readiness_and_index_figures() {
  let state = app_state(Arc::new(MockGenerator::answering("ok")), None).await;
  let app = create_router(Arc::new(state));

  let response = app
    .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
    .await
    .unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let json = body_json(response).await;
  assert_eq!(json["status"], "ready");
  assert_eq!(json["bookings"], 1_200);
  // Summary + two monthly + two cancellation rankings
  assert_eq!(json["passages_indexed"], 5);
  assert!(json.get("transaction_id").is_some());
}

#[tokio::test]
async fn version_returns_the_crate_version() {
  let state = app_state(Arc::new(MockGenerator::answering("ok")), None).await;
  let app = create_router(Arc::new(state));

  let response = app
    .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
    .await
    .unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let json = body_json(response).await;
  assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn analytics_returns_the_full_snapshot() {
  let state = app_state(Arc::new(MockGenerator::answering("ok")), None).await;
  let app = create_router(Arc::new(state));

  let response = app.oneshot(post_json("/analytics", json!({}))).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let json = body_json(response).await;
  assert_eq!(json["snapshot"]["summary"]["total_bookings"], 1_200);
  assert_eq!(json["snapshot"]["monthly"][0]["month"], "July");
  assert_eq!(json["snapshot"]["cancellation_by_country"][0]["country"], "PRT");
}

#[tokio::test]
async fn ask_answers_and_appends_history() {
  let dir = TempDir::new().unwrap();
  let history_path = dir.path().join("history.jsonl");
  let state = app_state(
    Arc::new(MockGenerator::answering("ADR peaks in August.")),
    Some(&history_path),
  )
  .await;
  let app = create_router(Arc::new(state));

  let request = post_json(
    "/ask",
    json!({ "question": "Which month has the highest ADR?", "include_sources": true }),
  );
  let response = app.oneshot(request).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let json = body_json(response).await;
  assert_eq!(json["answer"], "ADR peaks in August.");
  assert_eq!(json["sources"].as_array().unwrap().len(), 3);
  assert!(json["sources"][0]["category"].is_string());

  let log = std::fs::read_to_string(&history_path).unwrap();
  let entry: Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
  assert_eq!(entry["question"], "Which month has the highest ADR?");
  assert_eq!(entry["answer"], "ADR peaks in August.");
}

#[tokio::test]
async fn ask_omits_sources_unless_requested() {
  let state = app_state(Arc::new(MockGenerator::answering("Around 25%.")), None).await;
  let app = create_router(Arc::new(state));

  let request = post_json("/ask", json!({ "question": "What is the cancellation rate?" }));
  let response = app.oneshot(request).await.unwrap();

  assert_eq!(response.status(), StatusCode::OK);
  let json = body_json(response).await;
  assert_eq!(json["answer"], "Around 25%.");
  assert!(json.get("sources").is_none());
}

#[tokio::test]
async fn blank_questions_are_rejected() {
  let state = app_state(Arc::new(MockGenerator::answering("unused")), None).await;
  let app = create_router(Arc::new(state));

  let response = app.oneshot(post_json("/ask", json!({ "question": "   " }))).await.unwrap();

  assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  let json = body_json(response).await;
  assert_eq!(json["errors"][0]["key"], "empty_question");
}

#[tokio::test]
async fn generation_failures_map_to_bad_gateway() {
  let state = app_state(Arc::new(MockGenerator::failing()), None).await;
  let app = create_router(Arc::new(state));

  let request = post_json("/ask", json!({ "question": "What is the busiest month?" }));
  let response = app.oneshot(request).await.unwrap();

  assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
  let json = body_json(response).await;
  assert_eq!(json["errors"][0]["key"], "generation_failed");
}
