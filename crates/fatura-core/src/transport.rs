//! HTTP transport for the billing API
//!
//! A single configured `reqwest::Client` with base URL, timeout and JSON
//! content type. Every response is expected in the envelope
//! `{success, data, error?}`:
//!
//! - `success: true` returns `data` decoded as the requested type
//! - `success: false` becomes [`Error::Api`] with the backend's code/message
//! - network failures and non-2xx responses without a failure envelope are
//!   returned as [`Error::Http`] unchanged
//!
//! Requests and responses are logged at debug level; payloads at trace level.
//! Caller-supplied path values go through [`Endpoint`] so they stay a single
//! escaped segment.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Response envelope used by every backend endpoint
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<Value>,
    /// Some failures carry the message at the top level instead
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    fn into_error(self, status: Option<u16>) -> Error {
        let (code, message, details) = match self.error {
            Some(Value::Object(map)) => (
                map.get("code")
                    .and_then(Value::as_str)
                    .unwrap_or("UNKNOWN")
                    .to_string(),
                map.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or(self.message)
                    .unwrap_or_default(),
                map.get("details").cloned().filter(|d| !d.is_null()),
            ),
            Some(Value::String(message)) => ("UNKNOWN".to_string(), message, None),
            _ => (
                "UNKNOWN".to_string(),
                self.message.unwrap_or_default(),
                None,
            ),
        };

        Error::Api {
            status,
            code,
            message,
            details,
        }
    }
}

/// Endpoint path relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    /// Static path such as `/catalog/plans`
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Append one value as a segment; `/`, `?` and spaces are escaped
    pub fn segment(mut self, value: impl ToString) -> Self {
        self.segments.push(value.to_string());
        self
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Configured HTTP client for the billing API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Base URL '{}' cannot take a path",
                config.base_url
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(&endpoint.segments);
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: impl Into<Endpoint>) -> Result<T> {
        let url = self.url(&endpoint.into());
        let request = self.http_client.get(url.clone());
        self.execute(Method::GET, url.as_str(), request).await
    }

    pub async fn get_with_query<T, Q>(&self, endpoint: impl Into<Endpoint>, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(&endpoint.into());
        let request = self.http_client.get(url.clone()).query(query);
        self.execute(Method::GET, url.as_str(), request).await
    }

    pub async fn post<T, B>(&self, endpoint: impl Into<Endpoint>, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(&endpoint.into());
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(
                "API Request body: {}",
                serde_json::to_string(body).unwrap_or_default()
            );
        }
        let request = self.http_client.post(url.clone()).json(body);
        self.execute(Method::POST, url.as_str(), request).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: impl Into<Endpoint>) -> Result<T> {
        let url = self.url(&endpoint.into());
        let request = self.http_client.delete(url.clone());
        self.execute(Method::DELETE, url.as_str(), request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        debug!("API Request: {} {}", method, url);

        let response = request.send().await.map_err(|e| {
            warn!("API Request Error: {} {}: {}", method, url, e);
            Error::Http(e)
        })?;

        let status = response.status();
        debug!("API Response: {} {}", status.as_u16(), url);

        // Keep the transport error around in case the body is not an envelope
        let status_error = response.error_for_status_ref().err();
        let body = response.text().await?;
        trace!("API Response body: {}", body);

        let envelope = serde_json::from_str::<Envelope>(&body).ok();

        if let Some(http_error) = status_error {
            warn!("API Response Error: {} {}: {}", status.as_u16(), url, body);
            return Err(match envelope {
                Some(env) if !env.success => env.into_error(Some(status.as_u16())),
                _ => Error::Http(http_error),
            });
        }

        let envelope = envelope.ok_or_else(|| {
            Error::InvalidData(format!("Response from {} is not an API envelope", url))
        })?;

        if !envelope.success {
            let err = envelope.into_error(Some(status.as_u16()));
            warn!("API Response Error: {} {}: {}", status.as_u16(), url, err);
            return Err(err);
        }

        serde_json::from_value(envelope.data).map_err(|e| {
            warn!("API Response Error: unexpected data from {}: {}", url, e);
            Error::InvalidData(format!("Unexpected data from {}: {}", url, e))
        })
    }
}
