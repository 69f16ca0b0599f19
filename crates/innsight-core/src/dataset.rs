//! Raw dataset model and CSV ingestion
//!
//! The raw table uses empty fields and the literal string `NULL` for missing
//! values; optional columns deserialize those to `None` so the normalizer can
//! apply the missing-value policy explicitly.

use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::error::Result;

/// One reservation row, straight off the booking CSV
///
/// Column names match the source table; columns not listed here are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookingRecord {
  pub hotel: String,
  pub is_canceled: u8,
  pub lead_time: i64,
  pub arrival_date_year: i32,
  pub arrival_date_month: String,
  pub arrival_date_day_of_month: u32,
  pub stays_in_weekend_nights: u32,
  pub stays_in_week_nights: u32,
  pub adults: u32,
  #[serde(deserialize_with = "csv::invalid_option")]
  pub children: Option<f64>,
  pub babies: u32,
  pub meal: String,
  #[serde(deserialize_with = "null_string")]
  pub country: Option<String>,
  #[serde(deserialize_with = "csv::invalid_option")]
  pub agent: Option<f64>,
  #[serde(deserialize_with = "csv::invalid_option")]
  pub company: Option<f64>,
  pub adr: f64,
  pub reservation_status_date: String,
}

/// Treat empty fields and the literal `NULL` as a missing string
fn null_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = String::deserialize(deserializer)?;
  if value.is_empty() || value == "NULL" {
    Ok(None)
  } else {
    Ok(Some(value))
  }
}

/// Read every raw record from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<RawBookingRecord>> {
  let mut reader = csv::Reader::from_path(path)?;
  let mut records = Vec::new();
  for row in reader.deserialize() {
    records.push(row?);
  }
  Ok(records)
}
