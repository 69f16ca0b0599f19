//! One-time initialization shared by the server and one-shot commands
//!
//! Runs the full pipeline, builds or loads the semantic index, and wires the
//! answering engine. Initialization failures abort the process; a server that
//! comes up without its snapshot has nothing to serve.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use innsight_core::analytics::AnalyticsSnapshot;
use innsight_core::answer::AnswerEngine;
use innsight_core::embedding::{Embedder, HashedBowEmbedder, RemoteEmbedder};
use innsight_core::generation::{Generator, HttpGenerator};
use innsight_core::index::SemanticIndex;
use innsight_core::pipeline;

use crate::config::{DataOptions, EmbedderKind, GenerationOptions};
use crate::history::QueryHistory;

/// Bound on a single remote embedding round trip
const EMBEDDING_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything request handlers and commands need, built once at startup
pub struct AppState {
  pub snapshot: Arc<AnalyticsSnapshot>,
  pub engine: AnswerEngine,
  pub history: Option<QueryHistory>,
  pub passages_indexed: usize,
  pub index_path: PathBuf,
}

/// Construct the configured embedding provider
pub fn build_embedder(options: &DataOptions) -> Result<Arc<dyn Embedder>> {
  match options.embedder {
    EmbedderKind::Local => Ok(Arc::new(HashedBowEmbedder::default())),
    EmbedderKind::Remote => {
      let Some(url) = &options.embedding_url else {
        bail!("--embedding-url is required with --embedder remote");
      };
      let embedder = RemoteEmbedder::new(
        url,
        &options.embedding_model,
        options.embedding_dimension,
        EMBEDDING_TIMEOUT,
      )?;
      Ok(Arc::new(embedder))
    }
  }
}

/// Construct the chat-completions generation client
pub fn build_generator(options: &GenerationOptions) -> Result<Arc<dyn Generator>> {
  let generator = HttpGenerator::new(
    &options.generation_url,
    &options.generation_model,
    options.api_token.clone(),
  )?;
  Ok(Arc::new(generator))
}

/// Run the pipeline, build or load the index, and assemble shared state
pub async fn initialize(
  data: &DataOptions,
  generation: &GenerationOptions,
  history_path: Option<&Path>,
) -> Result<AppState> {
  let output = pipeline::run(&data.data)
    .with_context(|| format!("failed to build analytics from {}", data.data.display()))?;
  tracing::info!(
    records = output.records.len(),
    passages = output.passages.len(),
    "analytics snapshot derived"
  );

  let embedder = build_embedder(data)?;
  let index_path = data.index_path();
  let index = SemanticIndex::open_or_build(&index_path, output.passages, embedder)
    .await
    .with_context(|| format!("failed to prepare index at {}", index_path.display()))?;
  tracing::info!(passages = index.len(), path = %index_path.display(), "semantic index ready");

  let passages_indexed = index.len();
  let generator = build_generator(generation)?;
  let engine = AnswerEngine::with_index(Arc::new(index), generator);

  Ok(AppState {
    snapshot: Arc::new(output.snapshot),
    engine,
    history: history_path.map(QueryHistory::new),
    passages_indexed,
    index_path,
  })
}
