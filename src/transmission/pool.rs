use super::client::{RemoteWriteClient, RemoteWriteTarget};
use crate::error::{ReplayError, TransmissionError};
use crate::parsing::prometheus::remote_write_models::WriteRequest;
use std::ops::AddAssign;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// What the workers sent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolReport {
    pub batches: usize,
    pub samples: usize,
}

impl AddAssign for PoolReport {
    fn add_assign(&mut self, other: Self) {
        self.batches += other.batches;
        self.samples += other.samples;
    }
}

/// A fixed set of workers draining a bounded queue of write requests.
///
/// The first failing worker cancels the pool: the producer can no longer
/// submit, idle workers stop, and busy workers stop once their current
/// request completes. Requests still queued at that point are dropped.
pub struct TransmissionPool {
    sender: flume::Sender<WriteRequest>,
    workers: JoinSet<Result<PoolReport, TransmissionError>>,
    cancel: CancellationToken,
}

impl TransmissionPool {
    pub fn start(
        target: Arc<RemoteWriteTarget>,
        concurrency: usize,
        queue_capacity: usize,
    ) -> Result<Self, TransmissionError> {
        let (sender, receiver) = flume::bounded(queue_capacity);
        let cancel = CancellationToken::new();
        let mut workers = JoinSet::new();

        for worker_id in 0..concurrency {
            let client = RemoteWriteClient::new(target.clone())?;
            workers.spawn(run_worker(
                worker_id,
                client,
                receiver.clone(),
                cancel.clone(),
            ));
        }
        debug!("Started {} remote write workers", concurrency);

        Ok(Self {
            sender,
            workers,
            cancel,
        })
    }

    /// Queues a request, waiting while the queue is full.
    ///
    /// Fails with [`ReplayError::Aborted`] once the pool is cancelled;
    /// [`TransmissionPool::finish`] then tells why.
    pub async fn submit(&self, request: WriteRequest) -> Result<(), ReplayError> {
        if self.cancel.is_cancelled() {
            return Err(ReplayError::Aborted);
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ReplayError::Aborted),
            sent = self.sender.send_async(request) => sent.map_err(|_| ReplayError::Aborted),
        }
    }

    /// Stops the workers without waiting for the queue to drain.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Closes the queue and waits for every worker.
    ///
    /// Returns the first worker error, if any.
    pub async fn finish(self) -> Result<PoolReport, TransmissionError> {
        let Self {
            sender,
            mut workers,
            cancel,
        } = self;
        drop(sender);

        let mut report = PoolReport::default();
        let mut first_error = None;
        while let Some(joined) = workers.join_next().await {
            let outcome =
                joined.unwrap_or_else(|err| Err(TransmissionError::Worker(err.to_string())));
            match outcome {
                Ok(worker_report) => report += worker_report,
                Err(err) => {
                    cancel.cancel();
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}

/// Cancels the pool when dropped, unless the worker disarmed it on a clean exit.
/// A panicking worker unwinds through the drop and still stops its siblings.
struct CancelOnDrop {
    cancel: CancellationToken,
    armed: bool,
}

impl CancelOnDrop {
    fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.cancel.cancel();
        }
    }
}

async fn run_worker(
    worker_id: usize,
    client: RemoteWriteClient,
    receiver: flume::Receiver<WriteRequest>,
    cancel: CancellationToken,
) -> Result<PoolReport, TransmissionError> {
    let mut guard = CancelOnDrop::new(cancel.clone());
    let mut report = PoolReport::default();

    loop {
        let request = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = receiver.recv_async() => match received {
                Ok(request) => request,
                // Closed and drained
                Err(_) => break,
            },
        };

        let samples = request.sample_count();
        if let Err(err) = client.write(&request).await {
            error!(worker = worker_id, "Remote write failed: {}", err);
            // The guard cancels the pool on the way out
            return Err(err);
        }
        report.batches += 1;
        report.samples += samples;
    }

    guard.disarm();
    debug!(
        worker = worker_id,
        "Worker done after {} batches ({} samples)", report.batches, report.samples
    );
    Ok(report)
}
