//! Runtime configuration assembled from CLI arguments and environment
//!
//! Every path, endpoint, and credential arrives here; nothing is hardcoded
//! deeper in the stack.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Which embedding provider backs the semantic index
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbedderKind {
  /// Deterministic hashed bag-of-words, no external service required
  Local,
  /// Remote embedding service speaking the JSON daemon protocol
  Remote,
}

/// Dataset and index options shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct DataOptions {
  /// Path to the raw booking CSV
  #[arg(long, env = "INNSIGHT_DATA")]
  pub data: PathBuf,

  /// Persisted semantic index location (defaults under ~/.innsight)
  #[arg(long, env = "INNSIGHT_INDEX")]
  pub index: Option<PathBuf>,

  /// Embedding provider backing the semantic index
  #[arg(long, value_enum, default_value_t = EmbedderKind::Local)]
  pub embedder: EmbedderKind,

  /// Remote embedding service endpoint (required with --embedder remote)
  #[arg(long, env = "INNSIGHT_EMBEDDING_URL")]
  pub embedding_url: Option<String>,

  /// Model identifier recorded alongside persisted vectors
  #[arg(long, env = "INNSIGHT_EMBEDDING_MODEL", default_value = "all-MiniLM-L6-v2")]
  pub embedding_model: String,

  /// Vector width the remote embedding service produces
  #[arg(long, default_value_t = 384)]
  pub embedding_dimension: usize,
}

impl DataOptions {
  /// Configured index path, or the default under the user's home
  pub fn index_path(&self) -> PathBuf {
    self.index.clone().unwrap_or_else(default_index_path)
  }
}

/// Generation service options shared by `serve` and `ask`
#[derive(Debug, Clone, Args)]
pub struct GenerationOptions {
  /// Chat-completions endpoint for answer generation
  #[arg(
    long,
    env = "INNSIGHT_GENERATION_URL",
    default_value = "http://127.0.0.1:11434/v1/chat/completions"
  )]
  pub generation_url: String,

  /// Model name passed to the generation service
  #[arg(long, env = "INNSIGHT_GENERATION_MODEL", default_value = "mistral")]
  pub generation_model: String,

  /// Bearer token for the generation service
  #[arg(long, env = "INNSIGHT_API_TOKEN", hide_env_values = true)]
  pub api_token: Option<String>,
}

/// Default semantic index location
pub fn default_index_path() -> PathBuf {
  innsight_home().join("index.json")
}

/// Default question/answer audit log location
pub fn default_history_path() -> PathBuf {
  innsight_home().join("history.jsonl")
}

fn innsight_home() -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from("/tmp")).join(".innsight")
}
