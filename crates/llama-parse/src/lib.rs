//! llama-parse: client for the LlamaParse asynchronous document parsing service
//!
//! A document is uploaded as a parsing job, the job is polled until the service
//! reports a terminal status, and the result is fetched in the requested output
//! format and normalized into a single [`JobResult`] shape.

pub mod client;
pub mod config;
pub mod consts;
pub mod credentials;
pub mod error;
pub mod source;
pub mod transport;
pub mod types;

pub use client::{estimate_progress, ParseClient, ProgressEstimator, ProgressObserver};
pub use config::ClientConfig;
pub use credentials::{ConfigFileCredentials, CredentialProvider, StaticCredentials};
pub use error::{Error, Result};
pub use source::SourceFile;
pub use transport::{HttpTransport, Transport};
pub use types::{
    job::{Job, JobStatus},
    options::{OutputFormat, ParseOptions, TargetPages},
    result::{JobContent, JobMetadata, JobResult},
};
