//! Job status polling
//!
//! PENDING is the only state that keeps the loop going. SUCCESS, ERROR and
//! CANCELED all end it the same way; the result request that follows is what
//! surfaces a failed job. There is no attempt cap and no timeout: a job that
//! stays PENDING is polled until the caller drops the future.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use super::progress::{ProgressEstimator, ProgressObserver};
use crate::consts::{job_path, PROGRESS_COMPLETE};
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, Transport};
use crate::types::{Job, JobStatus};

/// Polls a job until it reaches a terminal status
pub struct JobPoller {
    transport: Arc<dyn Transport>,
    interval: Duration,
    estimator: ProgressEstimator,
}

impl JobPoller {
    pub fn new(
        transport: Arc<dyn Transport>,
        interval: Duration,
        estimator: ProgressEstimator,
    ) -> Self {
        Self {
            transport,
            interval,
            estimator,
        }
    }

    /// Current status of a job
    pub async fn status(&self, job_id: &str) -> Result<Job> {
        let body = self.transport.send(ApiRequest::get(job_path(job_id))).await?;
        serde_json::from_value(body)
            .map_err(|e| Error::invalid_response(format!("unexpected job status response: {}", e)))
    }

    /// Poll until the job leaves PENDING
    ///
    /// While pending, the observer receives the time-based estimate before each
    /// wait; once the loop ends it receives exactly 100. A failed status request
    /// aborts polling.
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<Job> {
        let mut job = self.status(job_id).await?;
        let started = Instant::now();
        let mut polls = 1u64;

        while job.status == JobStatus::Pending {
            let progress = self.estimator.estimate(started.elapsed());
            if let Some(observer) = observer {
                observer.on_progress(progress);
            }

            sleep(self.interval).await;
            job = self.status(job_id).await?;
            polls += 1;
        }

        if let Some(observer) = observer {
            observer.on_progress(PROGRESS_COMPLETE);
        }

        match job.status {
            JobStatus::Success => tracing::info!(
                "Job {} finished after {} status checks in {:?}",
                job.id,
                polls,
                started.elapsed()
            ),
            status => tracing::warn!(
                "Job {} ended with status {} after {} status checks",
                job.id,
                status,
                polls
            ),
        }

        Ok(job)
    }
}
