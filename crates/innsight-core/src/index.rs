//! Persisted semantic index with top-k cosine retrieval
//!
//! Vectors and passage metadata live in a single JSON file. The file records
//! which embedder produced the vectors and a fingerprint of the passage set;
//! build-or-load trusts an existing file and only warns when the fingerprint
//! no longer matches the current passages.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::embedding::{fnv1a64, Embedder};
use crate::error::{Error, Result};
use crate::passages::Passage;

/// A retrieved passage with its similarity score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPassage {
  pub passage: Passage,
  pub score: f32,
}

#[derive(Clone, Serialize, Deserialize)]
struct StoredEntry {
  passage: Passage,
  embedding: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
  embedder_id: String,
  fingerprint: u64,
  entries: Vec<StoredEntry>,
}

/// Nearest-neighbor index over the synthesized passage set
///
/// Immutable once built or loaded; queries take `&self` and are safe to run
/// concurrently from multiple tasks.
pub struct SemanticIndex {
  embedder: Arc<dyn Embedder>,
  fingerprint: u64,
  entries: Vec<StoredEntry>,
}

impl SemanticIndex {
  /// Embed every passage concurrently and hold the vectors in memory
  pub async fn build(passages: Vec<Passage>, embedder: Arc<dyn Embedder>) -> Result<Self> {
    let fingerprint = fingerprint_passages(&passages);
    let embeddings =
      try_join_all(passages.iter().map(|passage| embedder.embed(&passage.content))).await?;
    let entries = passages
      .into_iter()
      .zip(embeddings)
      .map(|(passage, embedding)| StoredEntry { passage, embedding })
      .collect();

    Ok(Self { embedder, fingerprint, entries })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Fingerprint of the passage set this index was built from
  pub fn fingerprint(&self) -> u64 {
    self.fingerprint
  }

  /// Persist vectors and passage metadata to a single JSON file
  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }

    let file = IndexFile {
      embedder_id: self.embedder.id().to_string(),
      fingerprint: self.fingerprint,
      entries: self.entries.clone(),
    };
    fs::write(path, serde_json::to_vec(&file)?)?;
    Ok(())
  }

  /// Deserialize a previously persisted index without recomputing embeddings
  pub fn load(path: &Path, embedder: Arc<dyn Embedder>) -> Result<Self> {
    if !path.exists() {
      return Err(Error::IndexNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let file: IndexFile = serde_json::from_slice(&bytes)?;
    if file.embedder_id != embedder.id() {
      tracing::warn!(
        stored = %file.embedder_id,
        active = %embedder.id(),
        "persisted index was built with a different embedder; queries may degrade"
      );
    }

    Ok(Self { embedder, fingerprint: file.fingerprint, entries: file.entries })
  }

  /// Load the index at `path` if one exists, otherwise build and persist
  ///
  /// An existing file is loaded as-is even when the current passage set no
  /// longer matches its fingerprint; the mismatch is logged, not repaired.
  pub async fn open_or_build(
    path: &Path,
    passages: Vec<Passage>,
    embedder: Arc<dyn Embedder>,
  ) -> Result<Self> {
    if path.exists() {
      let current = fingerprint_passages(&passages);
      let index = Self::load(path, embedder)?;
      if index.fingerprint != current {
        tracing::warn!(
          path = %path.display(),
          "persisted index does not match the current passage set; \
           run `innsight index --force` to rebuild"
        );
      }
      return Ok(index);
    }

    let index = Self::build(passages, embedder).await?;
    index.save(path)?;
    Ok(index)
  }

  /// Top-k retrieval by cosine similarity, highest first
  ///
  /// Ties break on passage position so results are stable across runs. Asking
  /// for more passages than exist returns everything.
  pub async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredPassage>> {
    if k == 0 {
      return Err(Error::InvalidTopK);
    }

    let query_embedding = self.embedder.embed(text).await?;
    let mut scored: Vec<(usize, f32)> = self
      .entries
      .iter()
      .enumerate()
      .map(|(position, entry)| (position, cosine_similarity(&query_embedding, &entry.embedding)))
      .collect();

    scored.sort_by(|a, b| {
      b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0))
    });
    scored.truncate(k);

    Ok(
      scored
        .into_iter()
        .map(|(position, score)| ScoredPassage {
          passage: self.entries[position].passage.clone(),
          score,
        })
        .collect(),
    )
  }
}

/// Content fingerprint of an ordered passage set
pub fn fingerprint_passages(passages: &[Passage]) -> u64 {
  let mut joined = String::new();
  for passage in passages {
    joined.push_str(&passage.content);
    joined.push('\u{1f}');
  }
  fnv1a64(joined.as_bytes())
}

/// Cosine similarity; mismatched or zero-magnitude vectors score 0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() {
    return 0.0;
  }

  let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
  let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
  let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

  if magnitude_a == 0.0 || magnitude_b == 0.0 {
    0.0
  } else {
    dot_product / (magnitude_a * magnitude_b)
  }
}
