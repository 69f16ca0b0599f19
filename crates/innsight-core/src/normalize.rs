//! Dataset normalizer: missing-value policy, meal mapping, date composition
//!
//! Records missing `children` are excluded entirely rather than imputed,
//! since downstream guest totals depend on that column being trustworthy.
//! Missing agent/company identifiers zero-fill and missing countries take the
//! `Unknown` sentinel.

use chrono::NaiveDate;

use crate::dataset::RawBookingRecord;
use crate::error::{Error, Result};
use crate::months;

/// Fixed meal plan lookup; `SC` and `Undefined` both mean no meal service
const MEAL_MAP: [(&str, &str); 5] = [
  ("BB", "Breakfast"),
  ("FB", "Full Board"),
  ("HB", "Half Board"),
  ("SC", "No meal"),
  ("Undefined", "No meal"),
];

/// Sentinel for records with no origin country information
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A cleaned booking record with composed dates and zero-filled identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
  pub hotel: String,
  pub is_canceled: bool,
  pub lead_time: i64,
  pub arrival_date: NaiveDate,
  pub arrival_month: String,
  pub country: String,
  pub meal: String,
  pub adults: u32,
  pub children: u32,
  pub babies: u32,
  pub weekend_nights: u32,
  pub week_nights: u32,
  pub adr: f64,
  pub agent: u32,
  pub company: u32,
  pub reservation_status_date: NaiveDate,
}

impl BookingRecord {
  /// Adults plus children; babies do not count toward occupancy
  pub fn total_guests(&self) -> u32 {
    self.adults + self.children
  }

  pub fn total_nights(&self) -> u32 {
    self.weekend_nights + self.week_nights
  }

  /// Average daily rate times nights stayed
  pub fn total_revenue(&self) -> f64 {
    self.adr * f64::from(self.total_nights())
  }
}

/// Map a meal plan code through the fixed lookup table
///
/// Unknown codes pass through verbatim; see DESIGN.md for the policy.
pub fn map_meal_code(code: &str) -> String {
  MEAL_MAP
    .iter()
    .find(|(raw, _)| *raw == code)
    .map(|(_, mapped)| (*mapped).to_string())
    .unwrap_or_else(|| code.to_string())
}

/// Compose a calendar date from year, English month name, and day of month
///
/// Invalid combinations (day 31 in a 30-day month, unknown month names) fail
/// rather than coerce.
pub fn compose_arrival_date(year: i32, month: &str, day: u32) -> Result<NaiveDate> {
  let month_number = months::month_number(month).ok_or_else(|| date_error(year, month, day))?;
  NaiveDate::from_ymd_opt(year, month_number, day).ok_or_else(|| date_error(year, month, day))
}

fn date_error(year: i32, month: &str, day: u32) -> Error {
  Error::DateComposition { year, month: month.to_string(), day }
}

/// Clean a full raw record set into the canonical table
pub fn normalize(raw: Vec<RawBookingRecord>) -> Result<Vec<BookingRecord>> {
  let mut records = Vec::with_capacity(raw.len());
  for row in raw {
    if let Some(record) = normalize_record(row)? {
      records.push(record);
    }
  }
  Ok(records)
}

fn normalize_record(row: RawBookingRecord) -> Result<Option<BookingRecord>> {
  let children = match row.children {
    Some(children) => children as u32,
    // No imputation: a record without a children count is dropped
    None => return Ok(None),
  };

  let arrival_date = compose_arrival_date(
    row.arrival_date_year,
    &row.arrival_date_month,
    row.arrival_date_day_of_month,
  )?;
  let reservation_status_date = parse_status_date(&row.reservation_status_date)?;

  Ok(Some(BookingRecord {
    hotel: row.hotel,
    is_canceled: row.is_canceled != 0,
    lead_time: row.lead_time,
    arrival_date,
    arrival_month: row.arrival_date_month,
    country: row.country.unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
    meal: map_meal_code(&row.meal),
    adults: row.adults,
    children,
    babies: row.babies,
    weekend_nights: row.stays_in_weekend_nights,
    week_nights: row.stays_in_week_nights,
    adr: row.adr,
    agent: row.agent.map(|id| id as u32).unwrap_or(0),
    company: row.company.map(|id| id as u32).unwrap_or(0),
    reservation_status_date,
  }))
}

fn parse_status_date(value: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| Error::DataIntegrity {
    field: "reservation_status_date".to_string(),
    reason: format!("unparseable date {value:?}"),
  })
}
