//! Parsing client: submit a document, poll its job, fetch the result
//!
//! `parse` is a sequential chain on one task: upload, then the poll loop (the
//! only recurring suspension point), then the result request. Nothing is
//! cancelled server-side if the future is dropped.

pub mod fetcher;
pub mod poller;
pub mod progress;
pub mod submitter;

use std::path::Path;
use std::sync::Arc;

pub use fetcher::ResultFetcher;
pub use poller::JobPoller;
pub use progress::{estimate_progress, ProgressEstimator, ProgressObserver};
pub use submitter::{build_upload_form, JobSubmitter};

use crate::config::ClientConfig;
use crate::credentials::CredentialProvider;
use crate::error::Result;
use crate::source::SourceFile;
use crate::transport::{HttpTransport, Transport};
use crate::types::{Job, JobResult, ParseOptions};

/// Client for the parsing service
///
/// Holds no per-job state, so concurrent `parse` calls on one instance are
/// safe; the authentication headers are fixed at construction.
pub struct ParseClient {
    submitter: JobSubmitter,
    poller: JobPoller,
    fetcher: ResultFetcher,
}

impl ParseClient {
    /// Create a client authenticated with the given API key
    pub fn new(api_key: &str, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(api_key, &config)?;
        Ok(Self::with_transport(Arc::new(transport), &config))
    }

    /// Create a client with a key supplied by a credential provider
    pub fn from_credentials(
        credentials: &dyn CredentialProvider,
        config: ClientConfig,
    ) -> Result<Self> {
        let api_key = credentials.api_key()?;
        Self::new(&api_key, config)
    }

    /// Create a client over any transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self {
            submitter: JobSubmitter::new(Arc::clone(&transport)),
            poller: JobPoller::new(
                Arc::clone(&transport),
                config.polling_interval(),
                ProgressEstimator::from_config(config),
            ),
            fetcher: ResultFetcher::new(transport),
        }
    }

    /// Parse a local file
    ///
    /// Polling has no attempt cap or timeout; wrap the call in
    /// `tokio::time::timeout` to bound it.
    pub async fn parse(
        &self,
        path: impl AsRef<Path>,
        options: &ParseOptions,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<JobResult> {
        let file = SourceFile::read(path).await?;
        self.parse_file(file, options, observer).await
    }

    /// Parse an already loaded document
    pub async fn parse_file(
        &self,
        file: SourceFile,
        options: &ParseOptions,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<JobResult> {
        let job = self.submitter.submit_file(file, options).await?;
        let job = self.poller.wait_for_completion(&job.id, observer).await?;
        self.fetcher.fetch(&job.id, options).await
    }

    /// Create a job without waiting for it
    pub async fn submit(&self, path: impl AsRef<Path>, options: &ParseOptions) -> Result<Job> {
        self.submitter.submit(path, options).await
    }

    /// Current status of a job
    pub async fn job_status(&self, job_id: &str) -> Result<Job> {
        self.poller.status(job_id).await
    }

    /// Fetch the result of a job that is already terminal
    pub async fn fetch_result(&self, job_id: &str, options: &ParseOptions) -> Result<JobResult> {
        self.fetcher.fetch(job_id, options).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory doubles for the transport and the progress observer

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    use super::ProgressObserver;
    use crate::error::{Error, Result};
    use crate::transport::{ApiRequest, Transport};

    /// Answers requests from a fixed script and records what was sent
    pub struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<Value>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub fn new(responses: Vec<Result<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<Value> {
            let path = request.path.clone();
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(Error::invalid_response(format!("no scripted response for {}", path)))
                })
        }
    }

    #[derive(Default)]
    pub struct RecordingObserver {
        values: Mutex<Vec<f64>>,
    }

    impl RecordingObserver {
        pub fn values(&self) -> Vec<f64> {
            self.values.lock().unwrap().clone()
        }
    }

    impl ProgressObserver for RecordingObserver {
        fn on_progress(&self, percent: f64) {
            self.values.lock().unwrap().push(percent);
        }
    }

    /// What a local server received for one request
    pub struct CapturedRequest {
        pub request_line: String,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl CapturedRequest {
        /// Header value by case-insensitive name
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }

        pub fn body_text(&self) -> String {
            String::from_utf8_lossy(&self.body).into_owned()
        }
    }

    /// Answer exactly one HTTP request on a loopback port
    ///
    /// Returns the base URL to point a client at (with an `/api` prefix) and a
    /// handle resolving to the captured request.
    pub async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}/api", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> CapturedRequest {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request head");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        let content_length = headers
            .iter()
            .find(|(name, _)| name == "content-length")
            .and_then(|(_, value)| value.parse::<usize>().ok());
        let chunked = headers
            .iter()
            .any(|(name, value)| name == "transfer-encoding" && value.contains("chunked"));

        let mut body = buf[head_end..].to_vec();
        loop {
            let complete = match content_length {
                Some(len) => body.len() >= len,
                None if chunked => body.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                break;
            }
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }

        CapturedRequest {
            request_line,
            headers,
            body,
        }
    }

    pub fn json_job(id: &str, status: &str) -> Value {
        json!({"id": id, "status": status})
    }

    pub fn result_body(field: &str, content: Value) -> Value {
        json!({
            field: content,
            "job_metadata": {
                "credits_used": 4.0,
                "credits_max": 7000.0,
                "job_credits_usage": 1.0,
                "job_pages": 1,
                "job_is_cache_hit": true
            }
        })
    }
}
