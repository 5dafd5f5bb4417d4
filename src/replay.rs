use crate::config::ReplaySettings;
use crate::datamodel::{BatchBuilder, ReplayDateTime, ReplayDateTimeExt, TimeWindow, time_range};
use crate::error::ReplayError;
use crate::parsing::json_dump::read_series_file;
use crate::transmission::{PoolReport, RemoteWriteTarget, TransmissionPool};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Replays every input file, in order, to the remote write endpoint.
///
/// Files are decoded one at a time. Their batches go through the pool queue,
/// so the next file is read while the previous batches are still being sent,
/// and reading pauses whenever the queue is full.
///
/// The first error of any kind stops the run and is returned.
pub async fn replay(settings: &ReplaySettings) -> Result<PoolReport, ReplayError> {
    settings.validate()?;
    let builder = BatchBuilder::new(settings.request_span)?;
    let target = Arc::new(RemoteWriteTarget::from_settings(settings));
    let pool = TransmissionPool::start(target, settings.concurrency, settings.queue_capacity)?;

    for path in &settings.files {
        if let Err(err) = replay_file(&pool, &builder, path).await {
            return Err(shutdown_after(pool, err).await);
        }
    }

    Ok(pool.finish().await?)
}

async fn replay_file(
    pool: &TransmissionPool,
    builder: &BatchBuilder,
    path: &Path,
) -> Result<(), ReplayError> {
    info!("Processing file {}", path.display());
    let series = read_series_file(path).await?;

    let Some((lowest, highest)) = time_range(&series) else {
        warn!("No samples in {}", path.display());
        return Ok(());
    };
    info!(
        "Lowest timestamp: {}",
        ReplayDateTime::from_unix_milliseconds_i64(lowest)
    );
    info!(
        "Highest timestamp: {}",
        ReplayDateTime::from_unix_milliseconds_i64(highest)
    );

    for batch in builder.build(&series) {
        info!(
            "Sending batch of {} samples for time window {}",
            batch.samples,
            display_window(&batch.window)
        );
        pool.submit(batch.request).await?;
    }
    Ok(())
}

/// Stops the pool after a failure and picks the error to report.
async fn shutdown_after(pool: TransmissionPool, err: ReplayError) -> ReplayError {
    match err {
        // A worker failed first, its error is the meaningful one
        ReplayError::Aborted => match pool.finish().await {
            Err(transmission_error) => transmission_error.into(),
            Ok(_) => ReplayError::Aborted,
        },
        err => {
            pool.abort();
            if let Err(transmission_error) = pool.finish().await {
                warn!("Transmission also failed: {}", transmission_error);
            }
            err
        }
    }
}

fn display_window(window: &TimeWindow) -> String {
    let start = ReplayDateTime::from_unix_milliseconds_i64(window.start_ms);
    match window.end_ms {
        Some(end_ms) => format!(
            "[{}, {})",
            start,
            ReplayDateTime::from_unix_milliseconds_i64(end_ms)
        ),
        None => format!("[{}, ...)", start),
    }
}
