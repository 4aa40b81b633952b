mod args;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syncpics_core::{
    default_config_path, load_config, validate_config, Converter, MagickConverter,
    SyncOrchestrator, SyncReport,
};

use args::Cli;
use output::ProgressPrinter;

/// Buffer size for the progress event channel
const PROGRESS_BUFFER_SIZE: usize = 256;

/// Exit code when the run completed but some conversions failed
const EXIT_CONVERSION_FAILURES: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so the action log on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(report) if report.has_failures() => {
            error!("{} conversions failed", report.failures.len());
            std::process::exit(EXIT_CONVERSION_FAILURES);
        }
        Ok(_) => {}
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<SyncReport> {
    let config_path = match &cli.config_file {
        Some(path) => path.clone(),
        None => default_config_path()
            .context("Cannot locate the home directory, pass --config-file")?,
    };

    info!("Loading configuration from {:?}", config_path);
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    if let Some(max) = cli.max_concurrency {
        config.pool.max_concurrency = usize::try_from(max).unwrap_or(usize::MAX);
    }

    validate_config(&config).context("Configuration validation failed")?;

    info!("Source: {:?}", config.syncpics.source);
    info!("Destination: {:?}", config.syncpics.destination);
    info!("Exclusions: {:?}", config.syncpics.excludes);

    let converter = Arc::new(MagickConverter::new(config.converter.clone()));
    if !cli.dryrun {
        converter
            .validate()
            .await
            .with_context(|| {
                format!("Cannot run {}", config.converter.magick_path.display())
            })?;
    }

    let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let printer = tokio::spawn(ProgressPrinter::new(cli.show_progress()).run(progress_rx));

    let orchestrator = SyncOrchestrator::new(config.syncpics.clone(), converter)
        .context("Failed to set up sync")?
        .with_settings(config.sync.clone())
        .with_pool_config(config.pool.clone())
        .with_progress(progress_tx);

    let result = orchestrator.run(&cli.sync_options()).await;

    // Closes the progress channel so the printer can finish
    drop(orchestrator);
    printer.await.context("Progress printer failed")?;

    let report = result?;
    info!(
        "Done: {} converted, {} copied, {} already present, {} excluded, {} ignored, {} failed",
        report.converted,
        report.copied,
        report.already_exists,
        report.excluded,
        report.ignored,
        report.failures.len()
    );

    Ok(report)
}
