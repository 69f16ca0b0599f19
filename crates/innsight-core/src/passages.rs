//! Document synthesizer: renders the snapshot into retrievable passages
//!
//! Passage text is embedded and retrieved verbatim, so numeric formatting is
//! fixed here and nowhere else; changing it changes embeddings and therefore
//! retrieval results. Construction is pure text assembly with no side
//! effects.

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsSnapshot, MonthlyMetric};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassageCategory {
  Summary,
  Monthly,
  Cancellations,
}

impl PassageCategory {
  /// Lowercase label matching the serialized form
  pub fn as_str(&self) -> &'static str {
    match self {
      PassageCategory::Summary => "summary",
      PassageCategory::Monthly => "monthly",
      PassageCategory::Cancellations => "cancellations",
    }
  }
}

/// A unit of retrievable analytics text with its categorical tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
  pub content: String,
  pub category: PassageCategory,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub month: Option<String>,
}

/// Render the snapshot into its fixed, ordered passage set
///
/// Order: overall summary, one passage per present month in calendar order,
/// country cancellation ranking, lead-time cancellation ranking.
pub fn synthesize(snapshot: &AnalyticsSnapshot) -> Vec<Passage> {
  let mut passages = Vec::with_capacity(snapshot.monthly.len() + 3);
  passages.push(summary_passage(snapshot));
  for metric in &snapshot.monthly {
    passages.push(monthly_passage(metric));
  }
  passages.push(country_cancellation_passage(snapshot));
  passages.push(lead_time_cancellation_passage(snapshot));
  passages
}

fn summary_passage(snapshot: &AnalyticsSnapshot) -> Passage {
  let summary = &snapshot.summary;
  let content = format!(
    "Booking Summary:\n- Total bookings: {}\n- Cancellation rate: {}\n- Average lead time: {:.1} days",
    group_thousands(summary.total_bookings as i64),
    percent(summary.cancellation_rate),
    summary.avg_lead_time,
  );

  Passage { content, category: PassageCategory::Summary, month: None }
}

fn monthly_passage(metric: &MonthlyMetric) -> Passage {
  let content = format!(
    "Month: {}\n- Average Daily Rate: ${:.2}\n- Total Revenue: ${}",
    metric.month,
    metric.avg_adr,
    group_thousands(metric.total_revenue.round() as i64),
  );

  Passage { content, category: PassageCategory::Monthly, month: Some(metric.month.clone()) }
}

fn country_cancellation_passage(snapshot: &AnalyticsSnapshot) -> Passage {
  let mut content = String::from("Top Cancellation Rates by Country:");
  for entry in &snapshot.cancellation_by_country {
    content.push_str(&format!("\n- {}: {}", entry.country, percent(entry.cancellation_rate)));
  }

  Passage { content, category: PassageCategory::Cancellations, month: None }
}

fn lead_time_cancellation_passage(snapshot: &AnalyticsSnapshot) -> Passage {
  let mut content = String::from("Cancellation Rates by Lead Time:");
  for entry in &snapshot.cancellation_by_lead_time {
    content.push_str(&format!("\n- {}: {}", entry.bucket, percent(entry.cancellation_rate)));
  }

  Passage { content, category: PassageCategory::Cancellations, month: None }
}

/// One decimal place, e.g. 0.37 renders as "37.0%"
fn percent(rate: f64) -> String {
  format!("{:.1}%", rate * 100.0)
}

/// Thousands separators, e.g. 1234567 renders as "1,234,567"
fn group_thousands(value: i64) -> String {
  let digits = value.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
  if value < 0 {
    grouped.push('-');
  }

  let leading = digits.len() % 3;
  if leading > 0 {
    grouped.push_str(&digits[..leading]);
  }
  for (index, chunk) in digits[leading..].as_bytes().chunks(3).enumerate() {
    if leading > 0 || index > 0 {
      grouped.push(',');
    }
    grouped.push_str(std::str::from_utf8(chunk).unwrap_or(""));
  }
  grouped
}
