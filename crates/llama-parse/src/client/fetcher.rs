//! Result retrieval and normalization

use std::sync::Arc;

use crate::consts::result_path;
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, Transport};
use crate::types::{JobResult, ParseOptions};

/// Fetches job results in the requested output format
pub struct ResultFetcher {
    transport: Arc<dyn Transport>,
}

impl ResultFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the result of a terminal job
    ///
    /// The job status is not inspected: ERROR and CANCELED jobs are fetched too,
    /// and whatever the service answers is surfaced.
    pub async fn fetch(&self, job_id: &str, options: &ParseOptions) -> Result<JobResult> {
        let format = options.output_format.as_str();

        let body = self
            .transport
            .send(ApiRequest::get(result_path(job_id, format)))
            .await
            .map_err(|e| match e {
                Error::Transport {
                    status,
                    status_text,
                    ..
                } => Error::ResultFetch {
                    job_id: job_id.to_string(),
                    status,
                    status_text,
                },
                other => other,
            })?;

        let result = JobResult::from_response(body)?;

        tracing::debug!(
            "Job {} result ({}): {:?} pages, {:?} credits, cache hit: {:?}",
            job_id,
            format,
            result.job_metadata.job_pages(),
            result.job_metadata.job_credits_usage(),
            result.job_metadata.job_is_cache_hit()
        );

        Ok(result)
    }
}
