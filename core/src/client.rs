//! Stateless request builder and response parser for the character API.
//!
//! # Design
//! `CharacterClient` holds only a `base_url` and carries no mutable state
//! between calls. The page query is split into `build_fetch_characters`,
//! which produces an `HttpRequest`, and `parse_fetch_characters`, which
//! consumes an `HttpResponse`. Whoever sits between the two performs the IO,
//! which keeps this module deterministic.

use tracing::{debug, warn};
use url::Url;

use crate::error::NetworkError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ApiErrorBody, CharacterPage, Status};

/// Public endpoint of the character API.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Synchronous, stateless client for the `/character` endpoint.
#[derive(Debug, Clone)]
pub struct CharacterClient {
    base_url: String,
}

impl CharacterClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build `GET {base}/character?page=N[&name=..][&status=..]`.
    ///
    /// `name` is sent trimmed and only when something is left after
    /// trimming. `status` is sent in its canonical API spelling.
    pub fn build_fetch_characters(
        &self,
        page: u32,
        name: Option<&str>,
        status: Option<Status>,
    ) -> Result<HttpRequest, NetworkError> {
        let mut url = Url::parse(&format!("{}/character", self.base_url))
            .map_err(|_| NetworkError::InvalidUrl)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
                query.append_pair("name", name);
            }
            if let Some(status) = status {
                query.append_pair("status", status.as_str());
            }
        }
        debug!(url = %url, "built character request");
        Ok(HttpRequest::get(url.as_str()).with_header("accept", "application/json"))
    }

    pub fn parse_fetch_characters(
        &self,
        response: HttpResponse,
    ) -> Result<CharacterPage, NetworkError> {
        check_status(&response)?;
        let body = response.body.ok_or(NetworkError::NoData)?;
        serde_json::from_slice(&body).map_err(NetworkError::DecodingError)
    }
}

/// Reject anything outside `200..=299`.
///
/// The API explains failures in an `{"error": ...}` body. It is logged when it
/// decodes and otherwise ignored; callers only ever see the status code.
fn check_status(response: &HttpResponse) -> Result<(), NetworkError> {
    if response.is_success() {
        return Ok(());
    }
    if let Some(api_error) = response
        .body
        .as_ref()
        .and_then(|body| serde_json::from_slice::<ApiErrorBody>(body).ok())
    {
        warn!(status = response.status, error = %api_error.error, "character API returned an error");
    }
    Err(NetworkError::BadStatusCode(response.status))
}
