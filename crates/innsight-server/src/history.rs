//! Append-only JSONL audit log of questions and answers
//!
//! One JSON object per line so the file stays greppable and partial writes
//! never corrupt earlier entries. Appends are serialized behind an async lock.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// One answered question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub question: String,
  pub answer: String,
  pub timestamp: DateTime<Utc>,
}

/// Disk-backed question/answer history
pub struct QueryHistory {
  path: PathBuf,
  lock: Mutex<()>,
}

impl QueryHistory {
  pub fn new(path: &Path) -> Self {
    Self { path: path.to_path_buf(), lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Append one entry, creating parent directories on first use
  pub async fn append(&self, question: &str, answer: &str) -> Result<()> {
    let _guard = self.lock.lock().await;

    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let entry = HistoryEntry {
      question: question.to_string(),
      answer: answer.to_string(),
      timestamp: Utc::now(),
    };
    let mut line = serde_json::to_string(&entry)?;
    line.push('\n');

    let mut file = std::fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
  }

  /// The most recent entries, oldest first; malformed lines are skipped
  pub async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
    let _guard = self.lock.lock().await;

    if !self.path.exists() {
      return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&self.path)?;
    let mut entries: Vec<HistoryEntry> = content
      .lines()
      .filter_map(|line| serde_json::from_str(line).ok())
      .collect();
    if entries.len() > limit {
      entries.drain(..entries.len() - limit);
    }
    Ok(entries)
  }
}
