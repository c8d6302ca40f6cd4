use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

mod app;
mod commands;
mod config;

use config::Config;

/// Logharbor - a terminal monitor for live structured log feeds
#[derive(Parser, Debug)]
#[command(name = "logharbor")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Feed endpoint to connect to (host:port)
    #[arg(value_name = "ENDPOINT")]
    endpoint: Option<String>,

    /// Retention window size in events
    #[arg(long)]
    capacity: Option<usize>,

    /// Initial level filter (ALL, INFO, WARN, ERROR, DEBUG)
    #[arg(long)]
    level: Option<String>,

    /// Initial search term
    #[arg(long)]
    search: Option<String>,

    /// Snapshot print interval in milliseconds
    #[arg(long)]
    interval: Option<u64>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Diagnostics go to stderr so the snapshot stream on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&args)?;

    let result = app::run(config).await;
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
    }
    result
}
