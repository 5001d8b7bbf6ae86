//! Async character fetcher: `CharacterClient` plus an injected transport.

use async_trait::async_trait;
use tracing::debug;

use crate::client::CharacterClient;
use crate::config::ExplorerConfig;
use crate::error::FetchError;
use crate::http::{HttpTransport, UreqTransport};
use crate::types::{CharacterPage, Status};

/// Source of character pages. The list controller depends on this seam only,
/// so tests can script responses without any HTTP.
#[async_trait]
pub trait CharacterFetcher: Send + Sync {
    async fn fetch_characters(
        &self,
        page: u32,
        name: Option<&str>,
        status: Option<Status>,
    ) -> Result<CharacterPage, FetchError>;
}

/// `CharacterFetcher` that goes over the network through `T`.
///
/// Errors are never recovered here. Transport failures come back unchanged,
/// everything else is a `NetworkError` from the client.
#[derive(Debug, Clone)]
pub struct DataFetcher<T> {
    client: CharacterClient,
    transport: T,
}

impl<T: HttpTransport> DataFetcher<T> {
    pub fn new(client: CharacterClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CharacterClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl DataFetcher<UreqTransport> {
    /// Fetcher for `config.base_url` over ureq, honouring
    /// `config.request_timeout`.
    pub fn from_config(config: &ExplorerConfig) -> Self {
        Self::new(
            CharacterClient::new(&config.base_url),
            UreqTransport::new(config.request_timeout),
        )
    }
}

#[async_trait]
impl<T: HttpTransport> CharacterFetcher for DataFetcher<T> {
    async fn fetch_characters(
        &self,
        page: u32,
        name: Option<&str>,
        status: Option<Status>,
    ) -> Result<CharacterPage, FetchError> {
        let request = self.client.build_fetch_characters(page, name, status)?;
        let response = self.transport.request(&request).await?;
        let page = self.client.parse_fetch_characters(response)?;
        debug!(
            results = page.results.len(),
            has_next = page.has_next(),
            "decoded character page"
        );
        Ok(page)
    }
}
