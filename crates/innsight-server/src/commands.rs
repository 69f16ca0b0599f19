//! One-shot CLI commands with colored terminal output

use anyhow::Result;
use colored::Colorize;

use innsight_core::analytics::AnalyticsSnapshot;
use innsight_core::index::SemanticIndex;
use innsight_core::pipeline;

use crate::config::DataOptions;
use crate::startup::{self, AppState};

/// Print the snapshot summary and headline groupings
pub fn print_analytics(snapshot: &AnalyticsSnapshot) {
  println!("{}", "Booking Analytics".bold());
  println!(
    "  {} {}",
    "Total bookings:".dimmed(),
    snapshot.summary.total_bookings.to_string().cyan()
  );
  println!(
    "  {} {}",
    "Cancellation rate:".dimmed(),
    format!("{:.1}%", snapshot.summary.cancellation_rate * 100.0).cyan()
  );
  println!(
    "  {} {}",
    "Average lead time:".dimmed(),
    format!("{:.1} days", snapshot.summary.avg_lead_time).cyan()
  );

  if !snapshot.monthly.is_empty() {
    println!("\n{}", "Monthly (ADR / revenue)".bold());
    for metric in &snapshot.monthly {
      println!(
        "  {:<10} ${:>7.2}  ${:.0}",
        metric.month, metric.avg_adr, metric.total_revenue
      );
    }
  }

  if !snapshot.top_countries.is_empty() {
    println!("\n{}", "Top countries by bookings".bold());
    for entry in &snapshot.top_countries {
      println!("  {:<8} {}", entry.country, entry.bookings);
    }
  }

  if !snapshot.cancellation_by_country.is_empty() {
    println!("\n{}", "Cancellation rate by country".bold());
    for entry in &snapshot.cancellation_by_country {
      println!("  {:<8} {:.1}%", entry.country, entry.cancellation_rate * 100.0);
    }
  }

  if !snapshot.cancellation_by_lead_time.is_empty() {
    println!("\n{}", "Cancellation rate by lead time".bold());
    for entry in &snapshot.cancellation_by_lead_time {
      println!("  {:<8} {:.1}%", entry.bucket, entry.cancellation_rate * 100.0);
    }
  }

  if !snapshot.guest_distribution.is_empty() {
    println!("\n{}", "Guests per booking".bold());
    for bucket in &snapshot.guest_distribution {
      println!("  {:<8} {}", bucket.guests, bucket.bookings);
    }
  }
}

/// Answer one question and print it, optionally with its grounding passages
pub async fn ask(state: &AppState, question: &str, show_sources: bool) -> Result<()> {
  let result = state.engine.answer(question).await?;

  println!("{} {}", "Q:".bold(), result.question);
  println!("{} {}", "A:".bold().green(), result.answer);

  if show_sources {
    println!("\n{}", "Sources".dimmed());
    for source in &result.sources {
      println!("{}", format!("  [{:.3}]", source.score).dimmed());
      for line in source.passage.content.lines() {
        println!("  {}", line.dimmed());
      }
    }
  }

  if let Some(history) = &state.history {
    if let Err(e) = history.append(&result.question, &result.answer).await {
      tracing::warn!(error = %e, "failed to append query history");
    }
  }

  Ok(())
}

/// Build the semantic index, discarding any persisted one when forced
pub async fn build_index(data: &DataOptions, force: bool) -> Result<()> {
  let output = pipeline::run(&data.data)?;
  let embedder = startup::build_embedder(data)?;
  let index_path = data.index_path();

  let index = if force {
    let index = SemanticIndex::build(output.passages, embedder).await?;
    index.save(&index_path)?;
    index
  } else {
    SemanticIndex::open_or_build(&index_path, output.passages, embedder).await?
  };

  println!(
    "{} indexed {} passages at {}",
    "✓".green(),
    index.len(),
    index_path.display()
  );
  Ok(())
}
