//! Authenticated HTTP transport for the parsing service
//!
//! The transport sends one request and decodes one JSON body. It has no retry,
//! polling or timeout policy of its own; those belong to the callers.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::source::SourceFile;

/// Multipart upload body: one file part plus text fields
///
/// Kept as plain data so callers can inspect exactly what will be sent; it is
/// only turned into a reqwest form at the HTTP edge.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub file_field: String,
    pub file: SourceFile,
    pub fields: Vec<(String, String)>,
}

impl UploadForm {
    pub fn new(file_field: impl Into<String>, file: SourceFile) -> Self {
        Self {
            file_field: file_field.into(),
            file,
            fields: Vec::new(),
        }
    }

    /// Append a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Value of the first text field with this name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn into_multipart(self) -> Result<reqwest::multipart::Form> {
        let SourceFile {
            filename,
            content_type,
            data,
        } = self.file;

        let mut part = reqwest::multipart::Part::bytes(data).file_name(filename);
        // Without a known type reqwest falls back to application/octet-stream
        if let Some(mime) = content_type {
            part = part.mime_str(mime)?;
        }

        let form = reqwest::multipart::Form::new().part(self.file_field, part);
        let form = self
            .fields
            .into_iter()
            .fold(form, |form, (name, value)| form.text(name, value));

        Ok(form)
    }
}

/// A single request against the service, relative to its base endpoint
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<UploadForm>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post_multipart(path: impl Into<String>, form: UploadForm) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(form),
        }
    }
}

/// Trait for sending requests to the parsing service
///
/// Implementations:
/// - `HttpTransport`: the real service over HTTPS
///
/// Any non-success status must come back as [`Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and decode the JSON response body
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// reqwest-backed transport carrying the bearer token and client signature
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given API key
    ///
    /// The key is only placed in the `Authorization` header; its shape is not
    /// checked here.
    pub fn new(api_key: &str, config: &ClientConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| Error::credential("API key contains characters not allowed in a header"))?;
        auth.set_sensitive(true);

        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| Error::config(format!("Invalid user agent: {}", config.user_agent)))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, agent);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let ApiRequest { method, path, body } = request;
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!("{} {}", method, url);

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(form) = body {
            builder = builder.multipart(form.into_multipart()?);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("{} {} returned {}: {}", method, path, status, body);
            return Err(Error::transport(
                method.as_str(),
                path,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        Ok(response.json::<Value>().await?)
    }
}
