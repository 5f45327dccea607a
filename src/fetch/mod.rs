//! Remote data sources
//!
//! [`RestFetcher`] downloads a JSON document over HTTP and decodes it like
//! the JSON file loader does.

use std::time::Duration;
use tracing::{debug, info};

use crate::import::{LoadError, parse_json_dataset};
use crate::models::Dataset;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error while fetching remote data
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL provided: {0}")]
    InvalidUrl(String),
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("Unsupported source type: {0}")]
    UnsupportedSource(String),
    #[error("HTTP request failed: {0}")]
    Request(String),
    #[error("HTTP request failed: status code {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Empty response received from {0}")]
    EmptyResponse(String),
    #[error("Failed to decode response: {0}")]
    Decode(#[source] LoadError),
}

/// Produces a dataset from a remote source
pub trait Fetcher {
    fn fetch(&self, source: &str) -> Result<Dataset, FetchError>;
}

/// Fetcher for a source type name (only `rest` is supported)
pub fn fetcher_for(source_type: &str) -> Result<Box<dyn Fetcher>, FetchError> {
    match source_type.trim().to_lowercase().as_str() {
        "rest" | "http" | "https" => Ok(Box::new(RestFetcher::new())),
        other => Err(FetchError::UnsupportedSource(other.to_string())),
    }
}

/// Fetches JSON over HTTP with a blocking client
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use tabular_sql::fetch::{Fetcher, RestFetcher};
///
/// let fetcher = RestFetcher::new()
///     .header("Authorization", "Bearer token")
///     .timeout(Duration::from_secs(10));
/// let dataset = fetcher.fetch("https://api.example.com/users").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RestFetcher {
    method: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
    timeout: Duration,
}

impl Default for RestFetcher {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: Vec::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn send(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let method = reqwest::Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|_| FetchError::InvalidMethod(self.method.clone()))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        let mut request = client.request(method, url);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !self.headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("accept")) {
            request = request.header(reqwest::header::ACCEPT, "application/json");
        }
        if let Some(body) = &self.body {
            request = request.body(body.clone());
        }

        let response = request.send().map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(format!("{}: {}", url, e))
            } else {
                FetchError::Request(format!("{}: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Request(format!("Failed to read response body: {}", e)))?;
        debug!(url, bytes = bytes.len(), "Received response");
        Ok(bytes.to_vec())
    }
}

impl Fetcher for RestFetcher {
    fn fetch(&self, source: &str) -> Result<Dataset, FetchError> {
        let url = source.trim();
        if url.is_empty() {
            return Err(FetchError::InvalidUrl("empty URL".to_string()));
        }

        let body = self.send(url)?;
        if body.is_empty() {
            return Err(FetchError::EmptyResponse(url.to_string()));
        }

        let dataset = parse_json_dataset(&body).map_err(FetchError::Decode)?;
        info!(url, rows = dataset.len(), "Fetched dataset");
        Ok(dataset)
    }
}
