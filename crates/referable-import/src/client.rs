//! Backend import client.
//!
//! Submits the raw file and its mapping as `multipart/form-data` and decodes
//! the JSON [`ImportSummary`]. There is no retry policy: a failure is
//! returned once and the caller decides what to show.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info, warn};

use referable_model::ImportSummary;

use crate::error::ImportError;
use crate::request::{CSV_MIME, FILE_PART, ImportRequest, MAPPING_PART};

/// Default HTTP request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends import requests somewhere.
///
/// The HTTP implementation is [`HttpImportClient`]; tests substitute their own.
pub trait ImportClient {
    fn submit(&self, request: &ImportRequest) -> Result<ImportSummary, ImportError>;
}

/// Connection settings for [`HttpImportClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the import endpoint.
    pub endpoint: String,
    /// Bearer token, when the endpoint requires one.
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Blocking HTTP client for the backend import endpoint.
pub struct HttpImportClient {
    client: Client,
    endpoint: reqwest::Url,
    api_token: Option<String>,
}

impl HttpImportClient {
    /// Builds a client; fails if the endpoint is not an http(s) URL.
    pub fn new(config: ClientConfig) -> Result<Self, ImportError> {
        let endpoint = reqwest::Url::parse(config.endpoint.trim())
            .map_err(|e| ImportError::InvalidEndpoint(format!("{}: {e}", config.endpoint)))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ImportError::InvalidEndpoint(config.endpoint));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    fn build_form(request: &ImportRequest) -> Result<Form, ImportError> {
        let file = Part::bytes(request.content.clone())
            .file_name(request.file_name.clone())
            .mime_str(CSV_MIME)
            .map_err(|e| ImportError::Encode(e.to_string()))?;
        Ok(Form::new()
            .part(FILE_PART, file)
            .text(MAPPING_PART, request.mapping_json()?))
    }
}

impl ImportClient for HttpImportClient {
    fn submit(&self, request: &ImportRequest) -> Result<ImportSummary, ImportError> {
        let form = Self::build_form(request)?;
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(USER_AGENT, concat!("referable/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .multipart(form);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        debug!(
            endpoint = %self.endpoint,
            file = %request.file_name,
            bytes = request.content.len(),
            "submitting import"
        );
        let response = builder
            .send()
            .map_err(|e| ImportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = server_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), message = %message, "import rejected");
            return Err(ImportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let summary: ImportSummary = response
            .json()
            .map_err(|e| ImportError::InvalidResponse(e.to_string()))?;
        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            errors = summary.errors.len(),
            "import accepted"
        );
        Ok(summary)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Extracts a human-readable message from an error response body.
///
/// Prefers a JSON `message`, then `error`, then the raw text. Blank bodies
/// yield `None`.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        if let Some(message) = parsed.message.or(parsed.error) {
            if !message.trim().is_empty() {
                return Some(message);
            }
        }
    }
    Some(trimmed.to_string())
}
