//! Wire-level constants shared by the client and the CLI

/// Base endpoint of the parsing service
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai/api";

/// Delay between two job status checks
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 1000;

/// Assumed job duration used to project progress
pub const DEFAULT_ESTIMATED_DURATION_MS: u64 = 30_000;

/// Progress is held below this value until the job leaves PENDING
pub const DEFAULT_PROGRESS_CEILING: f64 = 95.0;

/// Reported once polling has finished, whatever the terminal status
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Multipart field carrying the uploaded document
pub const UPLOAD_FILE_FIELD: &str = "file";

/// API keys issued by the service start with this prefix
pub const API_KEY_PREFIX: &str = "llx-";

/// Directory (under the home directory) holding the CLI configuration
pub const CONFIG_DIR_NAME: &str = ".llama-parse";

/// Credential file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// User agent sent with every request
pub fn default_user_agent() -> String {
    format!("llama-parse-cli/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn upload_path() -> &'static str {
    "/parsing/upload"
}

pub(crate) fn job_path(job_id: &str) -> String {
    format!("/parsing/job/{}", job_id)
}

pub(crate) fn result_path(job_id: &str, format: &str) -> String {
    format!("/parsing/job/{}/result/{}", job_id, format)
}
