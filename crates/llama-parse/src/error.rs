//! Error types for the parsing client

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Parsing client errors
///
/// Every variant is fatal to the enclosing `parse` call; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The service answered with a non-success status
    #[error("{method} {path} failed: {status} {status_text}")]
    Transport {
        method: String,
        path: String,
        status: u16,
        status_text: String,
    },

    /// The upload request was rejected
    #[error("Failed to create job: {status} {status_text}")]
    JobCreation { status: u16, status_text: String },

    /// The result request was rejected
    #[error("Failed to get result for job {job_id}: {status} {status_text}")]
    ResultFetch {
        job_id: String,
        status: u16,
        status_text: String,
    },

    /// The service answered with a body this client cannot interpret
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Reading the document to upload failed
    #[error("Failed to read '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// API key lookup or storage error
    #[error("Credential error: {0}")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a transport error from a rejected request
    pub fn transport(
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
    ) -> Self {
        Self::Transport {
            method: method.into(),
            path: path.into(),
            status,
            status_text: status_text.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Status code of a rejected request, if this error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. }
            | Error::JobCreation { status, .. }
            | Error::ResultFetch { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
