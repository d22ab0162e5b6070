//! Main entry point for the pulse CLI

use anyhow::Context;
use audience_pulse::cli::{Args, OutputFormatter, VerbosityLevel};
use audience_pulse::Analyzer;
use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level())?;

    debug!(
        "Starting pulse for {} (max_videos={}, popular={}, least_popular={}, sequential={})",
        args.link, args.max_videos, args.popular, args.least_popular, args.sequential
    );

    let mut formatter = OutputFormatter::new(args.verbosity_level(), args.format);
    if args.api_key.is_none() {
        formatter.debug("No API key given; YouTube links will be rejected");
    }

    let analyzer = Analyzer::new(args.api_key.clone(), args.fetch_config(), args.api_config())
        .context("failed to set up the YouTube client")?;

    let start_time = Instant::now();
    formatter.start_spinner(&args.link);
    let outcome = analyzer.analyze(&args.link).await;
    formatter.finish_spinner();

    let elapsed = start_time.elapsed();
    info!("Analysis finished in {}", humantime::format_duration(round_to_millis(elapsed)));

    formatter
        .print_outcome(&outcome)
        .context("failed to serialize the result")?;

    if outcome.is_error() {
        formatter.error("Analysis failed");
        return Ok(ExitCode::FAILURE);
    }

    formatter.success(&format!("Done in {:.1}s", elapsed.as_secs_f64()));
    Ok(ExitCode::SUCCESS)
}

/// Initialize logging system. Logs go to stderr; stdout carries the result.
fn init_logging(verbosity: VerbosityLevel) -> anyhow::Result<()> {
    let default_level = match verbosity {
        VerbosityLevel::Quiet => "error",
        VerbosityLevel::Normal => "info",
        VerbosityLevel::Verbose => "debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

fn round_to_millis(duration: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(duration.as_millis() as u64)
}
