//! Core types for the parsing client

pub mod job;
pub mod options;
pub mod result;

pub use job::{Job, JobStatus};
pub use options::{OutputFormat, ParseOptions, TargetPages};
pub use result::{JobContent, JobMetadata, JobResult};
