//! Startup pipeline: ingest, normalize, aggregate, synthesize
//!
//! Runs once at process startup, in sequence. Any failure aborts the run;
//! no partial snapshot is ever produced.

use std::path::Path;

use crate::analytics::{self, AnalyticsSnapshot};
use crate::dataset;
use crate::error::Result;
use crate::normalize::{self, BookingRecord};
use crate::passages::{self, Passage};

/// Everything downstream consumers need from one pipeline run
pub struct PipelineOutput {
  pub records: Vec<BookingRecord>,
  pub snapshot: AnalyticsSnapshot,
  pub passages: Vec<Passage>,
}

/// Run the full derivation pipeline over a booking CSV
pub fn run(data_path: &Path) -> Result<PipelineOutput> {
  let raw = dataset::load_csv(data_path)?;
  let records = normalize::normalize(raw)?;
  let snapshot = analytics::aggregate(&records);
  let passages = passages::synthesize(&snapshot);

  Ok(PipelineOutput { records, snapshot, passages })
}
