#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::Parser;
use prom_replay::config::{Cli, ReplayConfig, ReplaySettings};
use prom_replay::replay;
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ReplayConfig::load().context("Failed to load configuration")?;
    let settings = ReplaySettings::resolve(cli, config).context("Invalid configuration")?;

    info!(
        "Replaying {} files to {} with {} workers",
        settings.files.len(),
        settings.url,
        settings.concurrency
    );

    match replay(&settings).await {
        Ok(report) => {
            info!(
                "Sent {} batches ({} samples)",
                report.batches, report.samples
            );
            Ok(())
        }
        Err(err) => {
            error!("Replay failed: {}", err);
            Err(err.into())
        }
    }
}
