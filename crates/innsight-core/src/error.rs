//! Error taxonomy for the analytics pipeline and answering engine
//!
//! Pipeline errors are fatal at startup: no partial snapshot is ever
//! published. Query-time errors (generation failures, bad top-k) are meant to
//! be caught at the service boundary and surfaced as structured responses.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A raw record carries a required field that cannot be defaulted
  #[error("data integrity violation in `{field}`: {reason}")]
  DataIntegrity { field: String, reason: String },

  /// Year + month name + day of month do not form a calendar date
  #[error("cannot compose arrival date from year={year} month={month} day={day}")]
  DateComposition { year: i32, month: String, day: u32 },

  /// Load was requested but no persisted index exists at the path
  #[error("no semantic index found at {0}")]
  IndexNotFound(PathBuf),

  /// Query or answer requested before the index was built or loaded
  #[error("answering engine used before the semantic index was initialized")]
  NotInitialized,

  /// Top-k retrieval requires a positive k
  #[error("top-k retrieval requires k > 0")]
  InvalidTopK,

  /// The embedding provider failed to produce a vector
  #[error("embedding request failed: {0}")]
  Embedding(String),

  /// The external generation call errored or timed out
  #[error("answer generation failed: {0}")]
  Generation(String),

  #[error("failed to read dataset: {0}")]
  Dataset(#[from] csv::Error),

  #[error("index persistence failed: {0}")]
  Persistence(#[from] serde_json::Error),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
