//! Innsight - hotel booking analytics and grounded question answering

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use innsight_server::config::{self, DataOptions, GenerationOptions};
use innsight_server::server::server::start_server;
use innsight_server::{commands, startup};

#[derive(Parser)]
#[command(name = "innsight")]
#[command(version)]
#[command(about = "Derives booking analytics and answers questions grounded in them")]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Start the REST API server
  Serve {
    #[command(flatten)]
    data: DataOptions,

    #[command(flatten)]
    generation: GenerationOptions,

    /// Server bind address
    #[arg(long, env = "INNSIGHT_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Append answered questions to this JSONL audit log
    #[arg(long, env = "INNSIGHT_HISTORY")]
    history: Option<PathBuf>,

    /// Disable the question/answer audit log
    #[arg(long)]
    no_history: bool,
  },

  /// Answer a single question and exit
  Ask {
    #[command(flatten)]
    data: DataOptions,

    #[command(flatten)]
    generation: GenerationOptions,

    /// Show the retrieved source passages
    #[arg(short, long)]
    sources: bool,

    question: String,
  },

  /// Print the analytics snapshot
  Analytics {
    #[command(flatten)]
    data: DataOptions,
  },

  /// Build the semantic index ahead of serving
  Index {
    #[command(flatten)]
    data: DataOptions,

    /// Rebuild even when a persisted index exists
    #[arg(short, long)]
    force: bool,
  },
}

fn init_logging(verbose: bool) {
  let default_filter = if verbose { "innsight=debug,info" } else { "innsight=info,warn" };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_filter));

  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer())
    .with(filter)
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  match cli.command {
    Commands::Serve { data, generation, bind, history, no_history } => {
      let history = if no_history {
        None
      } else {
        Some(history.unwrap_or_else(config::default_history_path))
      };
      let state = startup::initialize(&data, &generation, history.as_deref()).await?;
      start_server(bind, Arc::new(state)).await?;
    }
    Commands::Ask { data, generation, sources, question } => {
      let state = startup::initialize(&data, &generation, None).await?;
      commands::ask(&state, &question, sources).await?;
    }
    Commands::Analytics { data } => {
      let output = innsight_core::pipeline::run(&data.data)?;
      commands::print_analytics(&output.snapshot);
    }
    Commands::Index { data, force } => {
      commands::build_index(&data, force).await?;
    }
  }

  Ok(())
}
