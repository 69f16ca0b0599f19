//! Fixed calendar ordering shared by the aggregator and synthesizer

/// English month names in calendar order, January first
pub const MONTH_ORDER: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December",
];

/// Month number (1-12) for an English month name
pub fn month_number(name: &str) -> Option<u32> {
  MONTH_ORDER.iter().position(|month| *month == name).map(|index| index as u32 + 1)
}
