//! Semantic index and answer engine tests over a synthesized passage set

use std::sync::Arc;
use tempfile::TempDir;

use innsight_core::analytics::{
  AnalyticsSnapshot, CountryCancellation, LeadTimeCancellation, MonthlyMetric, SummaryStats,
};
use innsight_core::answer::{AnswerEngine, RETRIEVAL_K};
use innsight_core::embedding::{Embedder, HashedBowEmbedder};
use innsight_core::generation::MockGenerator;
use innsight_core::index::SemanticIndex;
use innsight_core::passages::{self, PassageCategory};
use innsight_core::Error;

fn snapshot() -> AnalyticsSnapshot {
  let monthly = ["January", "February", "April", "July", "August", "December"]
    .iter()
    .enumerate()
    .map(|(index, month)| MonthlyMetric {
      month: (*month).to_string(),
      avg_adr: 70.0 + index as f64 * 10.0,
      total_revenue: 1_000_000.0 + index as f64 * 50_000.0,
    })
    .collect();

  AnalyticsSnapshot {
    summary: SummaryStats {
      total_bookings: 119_390,
      cancellation_rate: 0.37,
      avg_lead_time: 104.2,
    },
    monthly,
    cancellation_by_country: vec![
      CountryCancellation { country: "PRT".to_string(), cancellation_rate: 0.566 },
      CountryCancellation { country: "ESP".to_string(), cancellation_rate: 0.254 },
    ],
    cancellation_by_lead_time: vec![
      LeadTimeCancellation { bucket: "0-7d".to_string(), cancellation_rate: 0.095 },
      LeadTimeCancellation { bucket: "365d+".to_string(), cancellation_rate: 0.61 },
    ],
    top_countries: vec![],
    guest_distribution: vec![],
  }
}

fn embedder() -> Arc<dyn Embedder> {
  Arc::new(HashedBowEmbedder::default())
}

#[tokio::test]
async fn july_question_retrieves_the_july_passage() {
  let passages = passages::synthesize(&snapshot());
  let index = SemanticIndex::build(passages, embedder()).await.unwrap();

  let results =
    index.query("What is the average daily rate in July?", RETRIEVAL_K).await.unwrap();

  assert_eq!(results.len(), RETRIEVAL_K);
  assert!(results
    .iter()
    .any(|result| result.passage.month.as_deref() == Some("July")));
  // Highest similarity first
  for window in results.windows(2) {
    assert!(window[0].score >= window[1].score);
  }
}

#[tokio::test]
async fn save_then_load_preserves_top_k_results() {
  let passages = passages::synthesize(&snapshot());
  let built = SemanticIndex::build(passages, embedder()).await.unwrap();

  let dir = TempDir::new().unwrap();
  let path = dir.path().join("index.json");
  built.save(&path).unwrap();

  let loaded = SemanticIndex::load(&path, embedder()).unwrap();
  assert_eq!(built.len(), loaded.len());
  assert_eq!(built.fingerprint(), loaded.fingerprint());

  let question = "Which countries cancel the most bookings?";
  let before = built.query(question, RETRIEVAL_K).await.unwrap();
  let after = loaded.query(question, RETRIEVAL_K).await.unwrap();

  let before_contents: Vec<&str> =
    before.iter().map(|r| r.passage.content.as_str()).collect();
  let after_contents: Vec<&str> = after.iter().map(|r| r.passage.content.as_str()).collect();
  assert_eq!(before_contents, after_contents);
  for (a, b) in before.iter().zip(after.iter()) {
    assert_eq!(a.score, b.score);
  }
}

#[tokio::test]
async fn open_or_build_persists_on_first_run_and_loads_after() {
  let passages = passages::synthesize(&snapshot());
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("vectors").join("index.json");

  let first =
    SemanticIndex::open_or_build(&path, passages.clone(), embedder()).await.unwrap();
  assert!(path.exists());

  let second = SemanticIndex::open_or_build(&path, passages, embedder()).await.unwrap();
  assert_eq!(first.fingerprint(), second.fingerprint());
  assert_eq!(first.len(), second.len());
}

#[tokio::test]
async fn answers_are_grounded_in_retrieved_sources() {
  let passages = passages::synthesize(&snapshot());
  let index = Arc::new(SemanticIndex::build(passages, embedder()).await.unwrap());
  let engine =
    AnswerEngine::with_index(index, Arc::new(MockGenerator::answering("  About 37 percent.  ")));

  let result = engine.answer("What share of bookings get canceled?").await.unwrap();

  assert_eq!(result.answer, "About 37 percent.");
  assert_eq!(result.sources.len(), RETRIEVAL_K);
  assert_eq!(result.question, "What share of bookings get canceled?");
  assert!(result
    .sources
    .iter()
    .any(|source| source.passage.category == PassageCategory::Summary
      || source.passage.category == PassageCategory::Cancellations));
}

#[tokio::test]
async fn generation_failures_propagate_uncached() {
  let passages = passages::synthesize(&snapshot());
  let index = Arc::new(SemanticIndex::build(passages, embedder()).await.unwrap());
  let engine = AnswerEngine::with_index(index, Arc::new(MockGenerator::failing()));

  let result = engine.answer("What is the busiest month?").await;
  assert!(matches!(result, Err(Error::Generation(_))));
}

#[tokio::test]
async fn tiny_indexes_return_everything_for_large_k() {
  let snapshot = AnalyticsSnapshot {
    monthly: vec![],
    cancellation_by_country: vec![],
    cancellation_by_lead_time: vec![],
    ..snapshot()
  };
  let passages = passages::synthesize(&snapshot);
  let index = SemanticIndex::build(passages, embedder()).await.unwrap();

  // Summary plus two empty ranking passages
  let results = index.query("bookings", 10).await.unwrap();
  assert_eq!(results.len(), 3);
}
