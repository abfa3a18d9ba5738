//! Generic stream worker
//!
//! The worker drives the read/process/acknowledge loop: it drains its own
//! pending entries first, then reads new ones, runs the processor over each
//! job, and acknowledges the whole batch with a single XACK once every entry
//! has been handled. An entry is "handled" when processing succeeded, or when
//! its failure was recorded by a requeue or a move to the dead letter queue.
//! If that recording itself fails the entry is left unacknowledged, so the
//! stream redelivers it. Delivery is therefore at-least-once.

use crate::config::WorkerConfig;
use crate::consumer::{ReadBatch, StreamConsumer};
use crate::error::StreamError;
use crate::event::StreamEvent;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

/// A job that can travel through a stream
pub trait StreamJob: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Stable identifier for logging and deduplication
    fn job_id(&self) -> String;

    /// How many times this job has been retried
    fn retry_count(&self) -> u32;

    /// A copy of this job with its retry count incremented
    fn with_retry(&self) -> Self;

    fn exceeded_max_retries(&self, max_retries: u32) -> bool {
        self.retry_count() >= max_retries
    }
}

/// Processes jobs of a single type
#[async_trait]
pub trait StreamProcessor<J: StreamJob>: Send + Sync {
    /// Process one job. Errors are categorized via [`StreamError::category`]
    /// to decide between retry and dead letter queue.
    async fn process(&self, job: &J) -> Result<(), StreamError>;

    /// Processor name for logging
    fn name(&self) -> &'static str;

    /// Check that the processor's downstream dependencies are reachable
    async fn health_check(&self) -> Result<bool, StreamError> {
        Ok(true)
    }
}

/// Generic worker that consumes a stream and feeds a processor
pub struct StreamWorker<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    consumer: StreamConsumer,
    processor: Arc<P>,
    config: WorkerConfig,
    _phantom: PhantomData<J>,
}

impl<J, P> StreamWorker<J, P>
where
    J: StreamJob,
    P: StreamProcessor<J>,
{
    pub fn new(redis: ConnectionManager, processor: P, config: WorkerConfig) -> Self {
        Self {
            consumer: StreamConsumer::new(redis, config.clone()),
            processor: Arc::new(processor),
            config,
            _phantom: PhantomData,
        }
    }

    /// Run the worker loop until the shutdown signal flips to `true`
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), StreamError> {
        info!(
            processor = %self.processor.name(),
            stream = %self.config.stream_name,
            group = %self.config.consumer_group,
            consumer_id = %self.config.consumer_id,
            "Starting stream worker"
        );

        self.consumer.init_consumer_group().await?;

        // Pick up anything a dead consumer left behind before settling
        // into the loop
        self.consumer.claim_abandoned(self.config.batch_size).await?;

        let claim_interval = Duration::from_millis(self.config.claim_timeout_ms * 2);
        let mut last_claim = Instant::now();
        let mut consecutive_errors: u32 = 0;

        loop {
            if *shutdown.borrow() {
                info!(processor = %self.processor.name(), "Shutdown requested, stopping worker");
                break;
            }

            match self.process_batch().await {
                Ok(handled) => {
                    consecutive_errors = 0;

                    // A blocking read already waited inside Redis, so only
                    // sleep between polls in non-blocking mode
                    if handled == 0 && !self.config.is_blocking() {
                        let idle = Duration::from_millis(self.config.poll_interval_ms);
                        tokio::select! {
                            _ = shutdown.changed() => {}
                            _ = sleep(idle) => {}
                        }
                    }
                }
                Err(e) => {
                    consecutive_errors += 1;
                    let backoff = Duration::from_secs(2u64.pow(consecutive_errors.min(5)))
                        .min(Duration::from_secs(30));

                    warn!(
                        processor = %self.processor.name(),
                        error = %e,
                        consecutive_errors = consecutive_errors,
                        backoff_secs = backoff.as_secs(),
                        "Batch failed, backing off"
                    );

                    tokio::select! {
                        _ = shutdown.changed() => {}
                        _ = sleep(backoff) => {}
                    }
                }
            }

            if last_claim.elapsed() >= claim_interval {
                if let Err(e) = self.consumer.claim_abandoned(self.config.batch_size).await {
                    warn!(error = %e, "Failed to claim abandoned messages");
                }
                last_claim = Instant::now();
            }
        }

        Ok(())
    }

    /// Read one batch, process every entry, then acknowledge the batch.
    ///
    /// Returns the number of entries handled.
    async fn process_batch(&self) -> Result<usize, StreamError> {
        let mut batch: ReadBatch<J> = self.consumer.read_pending(self.config.batch_size).await?;
        if batch.is_empty() {
            batch = self.consumer.read_new(self.config.batch_size).await?;
        }
        if batch.is_empty() {
            return Ok(0);
        }

        let handled = batch.events.len() + batch.unparseable_ids.len();

        // Unparseable entries can never succeed, ack them with the batch
        let mut ack_ids = batch.unparseable_ids;

        for event in &batch.events {
            match self.process_event(event).await {
                Ok(()) => ack_ids.push(event.stream_id.clone()),
                Err(e) => {
                    // Requeue/DLQ failed too, leave the entry pending so the
                    // stream redelivers it
                    error!(
                        stream_id = %event.stream_id,
                        job_id = %event.job.job_id(),
                        error = %e,
                        "Could not record failure, leaving message unacknowledged"
                    );
                }
            }
        }

        self.consumer.ack_batch(&ack_ids).await?;

        Ok(handled)
    }

    /// Process a single event, routing failures to requeue or DLQ.
    ///
    /// `Ok(())` means the entry may be acknowledged.
    async fn process_event(&self, event: &StreamEvent<J>) -> Result<(), StreamError> {
        debug!(
            stream_id = %event.stream_id,
            job_id = %event.job.job_id(),
            age_ms = event.age_ms(),
            "Processing job"
        );

        match self.processor.process(&event.job).await {
            Ok(()) => {
                debug!(job_id = %event.job.job_id(), "Job processed");
                Ok(())
            }
            Err(e) => {
                warn!(
                    job_id = %event.job.job_id(),
                    error = %e,
                    category = ?e.category(),
                    "Job failed"
                );
                self.handle_failure(&event.job, &e).await
            }
        }
    }

    async fn handle_failure(&self, job: &J, failure: &StreamError) -> Result<(), StreamError> {
        if !failure.category().should_retry() {
            warn!(job_id = %job.job_id(), "Permanent failure, moving to DLQ");
            return self.consumer.move_to_dlq(job, &failure.to_string()).await;
        }

        if job.exceeded_max_retries(self.config.max_retries) {
            error!(
                job_id = %job.job_id(),
                retry_count = job.retry_count(),
                max_retries = self.config.max_retries,
                "Retries exhausted, moving to DLQ"
            );
            return self.consumer.move_to_dlq(job, &failure.to_string()).await;
        }

        info!(
            job_id = %job.job_id(),
            retry_count = job.retry_count() + 1,
            "Requeueing job for retry"
        );
        self.consumer.requeue(&job.with_retry()).await
    }
}
