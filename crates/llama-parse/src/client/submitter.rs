//! Job creation: upload the document and its options

use std::path::Path;
use std::sync::Arc;

use crate::consts::{upload_path, UPLOAD_FILE_FIELD};
use crate::error::{Error, Result};
use crate::source::SourceFile;
use crate::transport::{ApiRequest, Transport, UploadForm};
use crate::types::{Job, ParseOptions};

/// Uploads documents and creates parsing jobs
pub struct JobSubmitter {
    transport: Arc<dyn Transport>,
}

impl JobSubmitter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Read a local file and create a job for it
    pub async fn submit(&self, path: impl AsRef<Path>, options: &ParseOptions) -> Result<Job> {
        let file = SourceFile::read(path).await?;
        self.submit_file(file, options).await
    }

    /// Create a job for an already loaded document
    ///
    /// The returned job may already be terminal for small or cached documents.
    pub async fn submit_file(&self, file: SourceFile, options: &ParseOptions) -> Result<Job> {
        let filename = file.filename.clone();
        let form = build_upload_form(file, options);

        tracing::debug!(
            "[{}] Uploading with options: {}",
            filename,
            form.fields
                .iter()
                .map(|(k, _)| k.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let body = self
            .transport
            .send(ApiRequest::post_multipart(upload_path(), form))
            .await
            .map_err(|e| match e {
                Error::Transport {
                    status,
                    status_text,
                    ..
                } => Error::JobCreation {
                    status,
                    status_text,
                },
                other => other,
            })?;

        let job: Job = serde_json::from_value(body).map_err(|e| {
            Error::invalid_response(format!("unexpected upload response: {}", e))
        })?;

        tracing::info!("[{}] Created job {} ({})", filename, job.id, job.status);

        Ok(job)
    }
}

/// Multipart body for an upload: the file plus every option that is set
pub fn build_upload_form(file: SourceFile, options: &ParseOptions) -> UploadForm {
    options
        .form_fields()
        .into_iter()
        .fold(UploadForm::new(UPLOAD_FILE_FIELD, file), |form, (name, value)| {
            form.text(name, value)
        })
}
