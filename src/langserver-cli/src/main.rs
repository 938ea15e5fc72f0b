//! Langserver CLI - Main entry point.

use anyhow::Result;
use clap::Parser;

use langserver_cli::cli::{Cli, LogLevel, dispatch_command};

/// Log level override read when neither --verbose nor --trace is given.
const LOG_LEVEL_ENV: &str = "LANGSERVER_LOG_LEVEL";

fn init_logging(cli: &Cli) {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();

    let filter = match cli.log_level(env_level.as_deref()) {
        Some(level) => tracing_subscriber::EnvFilter::new(level.as_filter_str()),
        None => tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(LogLevel::default().as_filter_str())
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    dispatch_command(cli).await
}
