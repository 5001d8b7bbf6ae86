//! Core of the character explorer: API client, list state and controllers.
//!
//! # Overview
//! Browses the paginated `/character` endpoint of the Rick and Morty API with
//! name search and status filtering, and projects records into list rows and
//! a detail view. Presentation stays in the host application.
//!
//! # Design
//! - `CharacterClient` is stateless and does no IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse` (host-does-IO).
//! - `DataFetcher` pairs the client with an injected `HttpTransport` for
//!   async callers; `UreqTransport` is the bundled transport.
//! - `CharacterListState` holds pagination, search and filter state with pure
//!   transitions.
//! - `CharacterListController` is an actor owning that state: it debounces
//!   search, keeps at most one fetch in flight and publishes snapshots.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod detail;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod items;
pub mod state;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use client::{CharacterClient, DEFAULT_BASE_URL};
pub use config::ExplorerConfig;
pub use controller::{CharacterListController, ListEvent, ListRouter, ListSnapshot};
pub use detail::{CharacterDetailController, CharacterDetailItem, ImageState};
pub use error::{FetchError, ImageError, NetworkError};
pub use fetcher::{CharacterFetcher, DataFetcher};
pub use http::{HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use items::{CharacterListItem, StatusColor};
pub use state::CharacterListState;
pub use types::{ApiErrorBody, Character, CharacterPage, Location, PageInfo, Status};
