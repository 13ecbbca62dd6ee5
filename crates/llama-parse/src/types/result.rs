//! Normalized job result

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Parsed content, independent of the requested output format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobContent {
    /// Markdown or plain text body
    Text(String),
    /// One open-ended record per page
    Pages(Vec<Map<String, Value>>),
}

impl JobContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            JobContent::Text(text) => Some(text.as_str()),
            JobContent::Pages(_) => None,
        }
    }

    pub fn pages(&self) -> Option<&[Map<String, Value>]> {
        match self {
            JobContent::Text(_) => None,
            JobContent::Pages(pages) => Some(pages.as_slice()),
        }
    }
}

/// Usage accounting attached to every result
///
/// Kept exactly as the service sent it; the getters read the well-known keys
/// and return `None` when one is absent or has an unexpected type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobMetadata(Map<String, Value>);

impl JobMetadata {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Credits consumed by this job
    pub fn credits_used(&self) -> Option<f64> {
        self.0.get("credits_used").and_then(Value::as_f64)
    }

    /// Credit ceiling of the account
    pub fn credits_max(&self) -> Option<f64> {
        self.0.get("credits_max").and_then(Value::as_f64)
    }

    pub fn job_credits_usage(&self) -> Option<f64> {
        self.0.get("job_credits_usage").and_then(Value::as_f64)
    }

    pub fn job_pages(&self) -> Option<u64> {
        self.0.get("job_pages").and_then(Value::as_u64)
    }

    /// The service answered from its own cache
    pub fn job_is_cache_hit(&self) -> Option<bool> {
        self.0.get("job_is_cache_hit").and_then(Value::as_bool)
    }

    /// Any key, including ones this client does not know about
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Final outcome of a parsing job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub content: JobContent,
    pub job_metadata: JobMetadata,
}

impl JobResult {
    /// Normalize a raw result body
    ///
    /// `content` is taken from the first present field among `markdown`,
    /// `text` and `pages`, in that order. A `null` field counts as absent.
    pub fn from_response(mut body: Value) -> Result<Self> {
        let object = body
            .as_object_mut()
            .ok_or_else(|| Error::invalid_response("result body is not a JSON object"))?;

        let content = if let Some(markdown) = take_present(object, "markdown") {
            JobContent::Text(as_string("markdown", markdown)?)
        } else if let Some(text) = take_present(object, "text") {
            JobContent::Text(as_string("text", text)?)
        } else if let Some(pages) = take_present(object, "pages") {
            JobContent::Pages(serde_json::from_value(pages).map_err(|e| {
                Error::invalid_response(format!("'pages' is not a list of objects: {}", e))
            })?)
        } else {
            return Err(Error::invalid_response(
                "result body has none of 'markdown', 'text' or 'pages'",
            ));
        };

        let metadata = take_present(object, "job_metadata")
            .ok_or_else(|| Error::invalid_response("result body has no 'job_metadata'"))?;
        let job_metadata = match metadata {
            Value::Object(fields) => JobMetadata::new(fields),
            other => {
                return Err(Error::invalid_response(format!(
                    "'job_metadata' should be an object, got {}",
                    other
                )));
            }
        };

        Ok(Self {
            content,
            job_metadata,
        })
    }
}

fn take_present(object: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match object.remove(key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

fn as_string(field: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::invalid_response(format!(
            "'{}' should be a string, got {}",
            field, other
        ))),
    }
}
