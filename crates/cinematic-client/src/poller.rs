//! Status polling for a submitted job
//!
//! The poller asks for the job's status on a fixed interval until the job reaches a
//! terminal state or the overall timeout passes. Polls never overlap: the next tick is only
//! awaited after the previous answer arrived, and missed ticks are delayed rather than
//! bursted. Failed polls are logged and retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cinematic_shared::constants::{POLL_INTERVAL_SECONDS, POLL_TIMEOUT_SECONDS};
use tokio::time::{interval_at, sleep_until, timeout_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::job::{Job, StatusUpdate};

/// Anything that can answer "what is the status of job X".
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, job_id: &str) -> Result<StatusUpdate, ClientError>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn fetch_status(&self, job_id: &str) -> Result<StatusUpdate, ClientError> {
        (**self).fetch_status(job_id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(POLL_INTERVAL_SECONDS),
            timeout: Duration::from_secs(POLL_TIMEOUT_SECONDS),
        }
    }
}

pub struct JobPoller<S> {
    source: S,
    config: PollerConfig,
}

impl<S: StatusSource> JobPoller<S> {
    pub fn new(source: S, config: PollerConfig) -> Self {
        Self { source, config }
    }

    /// Poll until `job` is terminal, reporting every observed state through `on_update`.
    /// Returns the final view of the job.
    pub async fn track<F>(&self, mut job: Job, mut on_update: F) -> Job
    where
        F: FnMut(&Job) + Send,
    {
        if job.is_terminal() {
            return job;
        }

        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let mut ticker = interval_at(started + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut polls: u32 = 0;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => break,
                _ = ticker.tick() => {}
            }

            polls += 1;
            match timeout_at(deadline, self.source.fetch_status(&job.id)).await {
                Err(_) => break,
                Ok(Err(e)) => {
                    warn!(job_id = %job.id, poll = polls, "Status poll failed, retrying: {}", e);
                }
                Ok(Ok(update)) => {
                    job.apply(&update);
                    on_update(&job);
                    if job.is_terminal() {
                        debug!(job_id = %job.id, polls, status = ?job.status, "Job finished");
                        return job;
                    }
                }
            }
        }

        warn!(
            job_id = %job.id,
            polls,
            "No final status after {}s, giving up",
            self.config.timeout.as_secs()
        );
        job.time_out(self.config.timeout);
        on_update(&job);
        job
    }
}
