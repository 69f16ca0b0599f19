//! Analytics aggregator: summary statistics, groupings, and distributions
//!
//! Produces the immutable [`AnalyticsSnapshot`] once per pipeline run.
//! Records with no guests are excluded from the snapshot population but stay
//! in the normalized table. All rankings use deterministic tie-breaks
//! (alphabetical by country code) so identical input yields identical output.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::months::MONTH_ORDER;
use crate::normalize::BookingRecord;

/// Entries kept in the country rankings
const RANKING_SIZE: usize = 10;

/// Fixed lead-time bins in days: [0,7] (7,30] (30,90] (90,365] (365,737]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadTimeBucket {
  UpToWeek,
  WeekToMonth,
  MonthToQuarter,
  QuarterToYear,
  OverYear,
}

impl LeadTimeBucket {
  pub const ALL: [LeadTimeBucket; 5] = [
    LeadTimeBucket::UpToWeek,
    LeadTimeBucket::WeekToMonth,
    LeadTimeBucket::MonthToQuarter,
    LeadTimeBucket::QuarterToYear,
    LeadTimeBucket::OverYear,
  ];

  /// Display label used in passages and API payloads
  pub fn label(&self) -> &'static str {
    match self {
      LeadTimeBucket::UpToWeek => "0-7d",
      LeadTimeBucket::WeekToMonth => "7-30d",
      LeadTimeBucket::MonthToQuarter => "30-90d",
      LeadTimeBucket::QuarterToYear => "90-365d",
      LeadTimeBucket::OverYear => "365d+",
    }
  }

  /// Classify a lead time into its bucket
  ///
  /// Bins are right-closed and left-open except the first, which includes
  /// zero. Lead times outside [0, 737] stay unbucketed.
  pub fn classify(lead_time: i64) -> Option<Self> {
    match lead_time {
      0..=7 => Some(LeadTimeBucket::UpToWeek),
      8..=30 => Some(LeadTimeBucket::WeekToMonth),
      31..=90 => Some(LeadTimeBucket::MonthToQuarter),
      91..=365 => Some(LeadTimeBucket::QuarterToYear),
      366..=737 => Some(LeadTimeBucket::OverYear),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
  pub total_bookings: u64,
  /// Mean of the binary cancellation flag, always within [0, 1]
  pub cancellation_rate: f64,
  pub avg_lead_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetric {
  pub month: String,
  pub avg_adr: f64,
  pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryCancellation {
  pub country: String,
  pub cancellation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadTimeCancellation {
  pub bucket: String,
  pub cancellation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryBookings {
  pub country: String,
  pub bookings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestBucket {
  pub guests: u32,
  pub bookings: u64,
}

/// Immutable analytics snapshot derived once per pipeline run
///
/// Plain structured data throughout so presentation layers can serialize it
/// without touching the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
  pub summary: SummaryStats,
  /// Present months only, in fixed calendar order January through December
  pub monthly: Vec<MonthlyMetric>,
  /// Top 10 countries by cancellation rate, descending, ties alphabetical
  pub cancellation_by_country: Vec<CountryCancellation>,
  /// Buckets with at least one booking, in bin order
  pub cancellation_by_lead_time: Vec<LeadTimeCancellation>,
  /// Top 10 countries by booking count, descending, ties alphabetical
  pub top_countries: Vec<CountryBookings>,
  /// Bookings per guest total, ascending by guest count
  pub guest_distribution: Vec<GuestBucket>,
}

/// Derive the snapshot from the normalized record table
pub fn aggregate(records: &[BookingRecord]) -> AnalyticsSnapshot {
  let population: Vec<&BookingRecord> =
    records.iter().filter(|record| record.total_guests() > 0).collect();

  AnalyticsSnapshot {
    summary: summarize(&population),
    monthly: monthly_metrics(&population),
    cancellation_by_country: cancellation_by_country(&population),
    cancellation_by_lead_time: cancellation_by_lead_time(&population),
    top_countries: top_countries(&population),
    guest_distribution: guest_distribution(&population),
  }
}

fn summarize(population: &[&BookingRecord]) -> SummaryStats {
  let total = population.len() as u64;
  if total == 0 {
    return SummaryStats { total_bookings: 0, cancellation_rate: 0.0, avg_lead_time: 0.0 };
  }

  let canceled = population.iter().filter(|record| record.is_canceled).count();
  let lead_time_sum: i64 = population.iter().map(|record| record.lead_time).sum();

  SummaryStats {
    total_bookings: total,
    cancellation_rate: canceled as f64 / total as f64,
    avg_lead_time: lead_time_sum as f64 / total as f64,
  }
}

fn monthly_metrics(population: &[&BookingRecord]) -> Vec<MonthlyMetric> {
  let mut by_month: HashMap<&str, (f64, u64, f64)> = HashMap::new();
  for record in population {
    let entry = by_month.entry(record.arrival_month.as_str()).or_default();
    entry.0 += record.adr;
    entry.1 += 1;
    entry.2 += record.total_revenue();
  }

  // Absent months are omitted, not zero-filled
  MONTH_ORDER
    .iter()
    .filter_map(|month| {
      by_month.get(month).map(|(adr_sum, count, revenue)| MonthlyMetric {
        month: (*month).to_string(),
        avg_adr: adr_sum / *count as f64,
        total_revenue: *revenue,
      })
    })
    .collect()
}

fn cancellation_by_country(population: &[&BookingRecord]) -> Vec<CountryCancellation> {
  let mut by_country: HashMap<&str, (u64, u64)> = HashMap::new();
  for record in population {
    let entry = by_country.entry(record.country.as_str()).or_default();
    if record.is_canceled {
      entry.0 += 1;
    }
    entry.1 += 1;
  }

  let mut ranked: Vec<CountryCancellation> = by_country
    .into_iter()
    .map(|(country, (canceled, total))| CountryCancellation {
      country: country.to_string(),
      cancellation_rate: canceled as f64 / total as f64,
    })
    .collect();

  ranked.sort_by(|a, b| {
    b.cancellation_rate
      .partial_cmp(&a.cancellation_rate)
      .unwrap_or(Ordering::Equal)
      .then_with(|| a.country.cmp(&b.country))
  });
  ranked.truncate(RANKING_SIZE);
  ranked
}

fn cancellation_by_lead_time(population: &[&BookingRecord]) -> Vec<LeadTimeCancellation> {
  let mut by_bucket: HashMap<LeadTimeBucket, (u64, u64)> = HashMap::new();
  for record in population {
    if let Some(bucket) = LeadTimeBucket::classify(record.lead_time) {
      let entry = by_bucket.entry(bucket).or_default();
      if record.is_canceled {
        entry.0 += 1;
      }
      entry.1 += 1;
    }
  }

  LeadTimeBucket::ALL
    .iter()
    .filter_map(|bucket| {
      by_bucket.get(bucket).map(|(canceled, total)| LeadTimeCancellation {
        bucket: bucket.label().to_string(),
        cancellation_rate: *canceled as f64 / *total as f64,
      })
    })
    .collect()
}

fn top_countries(population: &[&BookingRecord]) -> Vec<CountryBookings> {
  let mut counts: HashMap<&str, u64> = HashMap::new();
  for record in population {
    *counts.entry(record.country.as_str()).or_default() += 1;
  }

  let mut ranked: Vec<CountryBookings> = counts
    .into_iter()
    .map(|(country, bookings)| CountryBookings { country: country.to_string(), bookings })
    .collect();

  ranked
    .sort_by(|a, b| b.bookings.cmp(&a.bookings).then_with(|| a.country.cmp(&b.country)));
  ranked.truncate(RANKING_SIZE);
  ranked
}

fn guest_distribution(population: &[&BookingRecord]) -> Vec<GuestBucket> {
  let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
  for record in population {
    *counts.entry(record.total_guests()).or_default() += 1;
  }

  counts.into_iter().map(|(guests, bookings)| GuestBucket { guests, bookings }).collect()
}
