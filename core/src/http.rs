//! HTTP transport types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `CharacterClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network; whoever executes the round-trip is an `HttpTransport`. Native
//! hosts that do their own IO stay on the build/parse pair (see the ffi
//! crate), async callers inject a transport into `DataFetcher`.
//!
//! `UreqTransport` is the bundled implementation. ureq is blocking, so each
//! call runs on tokio's blocking pool.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{FetchError, NetworkError};

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

/// An HTTP response described as plain data.
///
/// `body` is `None` when the server sent no payload at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Option<Bytes>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Executes one HTTP round-trip.
///
/// Non-2xx statuses are data, not errors: implementations return them as an
/// `HttpResponse` and leave interpretation to the caller. Only failures that
/// prevent a response from arriving at all are reported as `FetchError`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// Blocking ureq agent driven from tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn request(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        if url::Url::parse(&request.url).is_err() {
            return Err(NetworkError::InvalidUrl.into());
        }
        let agent = self.agent.clone();
        let request = request.clone();
        tokio::task::spawn_blocking(move || execute_blocking(&agent, &request))
            .await
            .map_err(|e| FetchError::Transport(format!("transport task failed: {e}")))?
    }
}

fn execute_blocking(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
    let mut builder = agent.get(request.url.as_str());
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    let mut response = builder.call().map_err(map_ureq_error)?;
    let status = response.status().as_u16();
    let bytes = response.body_mut().read_to_vec().map_err(map_ureq_error)?;

    Ok(HttpResponse {
        status,
        body: (!bytes.is_empty()).then(|| Bytes::from(bytes)),
    })
}

fn map_ureq_error(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::BadUri(_) => FetchError::Network(NetworkError::InvalidUrl),
        other => FetchError::Transport(other.to_string()),
    }
}
