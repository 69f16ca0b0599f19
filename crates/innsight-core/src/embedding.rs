//! Embedding providers for passages and queries
//!
//! Two implementations ship: a deterministic local hashed bag-of-words
//! embedder that needs no model service, and a remote HTTP client for an
//! external embedding daemon. Both must be deterministic for identical input
//! or persisted indexes stop matching fresh queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};

/// Vector width of the default local embedder
pub const DEFAULT_DIMENSION: usize = 256;

/// Common English filler words excluded from local embeddings
const STOP_WORDS: &[&str] = &[
  "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
  "from", "is", "are", "was", "were", "be", "been", "do", "does", "did", "have", "has", "had",
  "will", "would", "could", "should", "what", "which", "when", "where", "how", "why", "who",
  "it", "its", "this", "that", "these", "those", "there",
];

/// Deterministic text embedding: identical input yields identical output
#[async_trait]
pub trait Embedder: Send + Sync {
  /// Identifier recorded alongside persisted vectors
  fn id(&self) -> &str;

  /// Width of every vector this embedder produces
  fn dimension(&self) -> usize;

  async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Extract meaningful lowercase tokens, trimming punctuation and stop words
pub(crate) fn tokenize(text: &str) -> Vec<String> {
  text
    .split_whitespace()
    .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
    .filter(|word| !word.is_empty() && !STOP_WORDS.contains(&word.as_str()))
    .collect()
}

/// FNV-1a, used both for token bucketing and passage-set fingerprints
pub(crate) fn fnv1a64(bytes: &[u8]) -> u64 {
  let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
  for byte in bytes {
    hash ^= u64::from(*byte);
    hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
  }
  hash
}

/// Scale a vector to unit length; zero vectors pass through unchanged
pub(crate) fn l2_normalize(vector: Vec<f32>) -> Vec<f32> {
  let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
  if magnitude > 0.0 {
    vector.into_iter().map(|x| x / magnitude).collect()
  } else {
    vector
  }
}

/// Local embedder hashing tokens into a fixed number of buckets
///
/// Crude next to a sentence transformer, but fully deterministic, offline,
/// and adequate for the short factual passages this system indexes.
pub struct HashedBowEmbedder {
  id: String,
  dimension: usize,
}

impl HashedBowEmbedder {
  pub fn new(dimension: usize) -> Self {
    Self { id: format!("hashed-bow-{dimension}"), dimension }
  }

  fn vectorize(&self, text: &str) -> Vec<f32> {
    let mut vector = vec![0.0_f32; self.dimension];
    for token in tokenize(text) {
      let bucket = (fnv1a64(token.as_bytes()) % self.dimension as u64) as usize;
      vector[bucket] += 1.0;
    }
    l2_normalize(vector)
  }
}

impl Default for HashedBowEmbedder {
  fn default() -> Self {
    Self::new(DEFAULT_DIMENSION)
  }
}

#[async_trait]
impl Embedder for HashedBowEmbedder {
  fn id(&self) -> &str {
    &self.id
  }

  fn dimension(&self) -> usize {
    self.dimension
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    Ok(self.vectorize(text))
  }
}

#[derive(Serialize)]
struct EmbeddingRequest {
  texts: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  embeddings: Vec<Vec<f32>>,
  error: Option<String>,
}

/// Client for an external embedding service speaking the daemon JSON protocol
pub struct RemoteEmbedder {
  id: String,
  dimension: usize,
  endpoint: String,
  client: reqwest::Client,
}

impl RemoteEmbedder {
  /// `model` becomes the identifier recorded in persisted indexes
  pub fn new(endpoint: &str, model: &str, dimension: usize, timeout: Duration) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| Error::Embedding(e.to_string()))?;

    Ok(Self { id: model.to_string(), dimension, endpoint: endpoint.to_string(), client })
  }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
  fn id(&self) -> &str {
    &self.id
  }

  fn dimension(&self) -> usize {
    self.dimension
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest { texts: vec![text.to_string()] };
    let response = self
      .client
      .post(&self.endpoint)
      .json(&request)
      .send()
      .await
      .map_err(|e| Error::Embedding(e.to_string()))?;

    if !response.status().is_success() {
      return Err(Error::Embedding(format!("embedding service returned {}", response.status())));
    }

    let payload: EmbeddingResponse =
      response.json().await.map_err(|e| Error::Embedding(e.to_string()))?;
    if let Some(error) = payload.error {
      return Err(Error::Embedding(error));
    }

    payload
      .embeddings
      .into_iter()
      .next()
      .ok_or_else(|| Error::Embedding("service returned no embeddings".to_string()))
  }
}

/// Canned embedder for dependency injection in tests
pub struct MockEmbedder {
  pub response_embedding: Vec<f32>,
  pub fail: bool,
}

#[async_trait]
impl Embedder for MockEmbedder {
  fn id(&self) -> &str {
    "mock"
  }

  fn dimension(&self) -> usize {
    self.response_embedding.len()
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>> {
    if self.fail {
      return Err(Error::Embedding(format!("mock failure for text: {text}")));
    }
    Ok(self.response_embedding.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokenize_drops_stop_words_and_punctuation() {
    let tokens = tokenize("What is the Average Daily Rate in July?");
    assert_eq!(tokens, vec!["average", "daily", "rate", "july"]);
  }

  #[test]
  fn fnv_hash_is_stable() {
    assert_eq!(fnv1a64(b"july"), fnv1a64(b"july"));
    assert_ne!(fnv1a64(b"july"), fnv1a64(b"june"));
  }

  #[tokio::test]
  async fn hashed_embeddings_are_deterministic_and_unit_length() {
    let embedder = HashedBowEmbedder::default();
    let first = embedder.embed("Month: July - Average Daily Rate").await.unwrap();
    let second = embedder.embed("Month: July - Average Daily Rate").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), DEFAULT_DIMENSION);
    let magnitude: f32 = first.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((magnitude - 1.0).abs() < 1e-5);
  }

  #[tokio::test]
  async fn empty_text_embeds_to_the_zero_vector() {
    let embedder = HashedBowEmbedder::default();
    let vector = embedder.embed("").await.unwrap();
    assert!(vector.iter().all(|x| *x == 0.0));
  }

  #[tokio::test]
  async fn mock_embedder_can_inject_failures() {
    let embedder = MockEmbedder { response_embedding: vec![0.1; 4], fail: true };
    assert!(embedder.embed("anything").await.is_err());
  }
}
