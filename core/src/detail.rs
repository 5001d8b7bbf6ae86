//! Detail projection of one character and its portrait download.
//!
//! The projection is pure and synchronous. The portrait is fetched through
//! the same `HttpTransport` seam as pages; progress is published as an
//! `ImageState` so the presentation layer can show a placeholder.

use bytes::Bytes;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{FetchError, ImageError};
use crate::http::{HttpRequest, HttpTransport};
use crate::items::StatusColor;
use crate::types::Character;

/// Prefix for episode labels.
pub const EPISODE_LABEL: &str = "Episode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDetailItem {
    pub id: i64,
    pub name: String,
    pub status_color: StatusColor,
    pub status: String,
    pub species: String,
    pub gender: String,
    pub origin: String,
    pub location: String,
    pub image_url: String,
    pub episodes: Vec<String>,
}

impl From<&Character> for CharacterDetailItem {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            status_color: character.status.into(),
            status: character.status.as_str().to_string(),
            species: character.species.clone(),
            gender: character.gender.clone(),
            origin: character.origin.name.clone(),
            location: character.location.name.clone(),
            image_url: character.image.clone(),
            episodes: character
                .episode
                .iter()
                .filter_map(|url| episode_label(url))
                .collect(),
        }
    }
}

/// `".../episode/28"` becomes `"Episode 28"`. URLs with no non-empty path
/// segment yield nothing.
pub fn episode_label(url: &str) -> Option<String> {
    let segment = url.split('/').filter(|s| !s.is_empty()).last()?;
    Some(format!("{EPISODE_LABEL} {segment}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Idle,
    Loading,
    Loaded(Bytes),
    Failed(String),
}

impl ImageState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ImageState::Loading)
    }
}

/// Backs the detail screen for one already-fetched character.
#[derive(Debug)]
pub struct CharacterDetailController {
    character: Character,
    item: CharacterDetailItem,
    image: watch::Sender<ImageState>,
}

impl CharacterDetailController {
    pub fn new(character: Character) -> Self {
        let item = CharacterDetailItem::from(&character);
        let (image, _) = watch::channel(ImageState::Idle);
        Self {
            character,
            item,
            image,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn item(&self) -> &CharacterDetailItem {
        &self.item
    }

    pub fn subscribe(&self) -> watch::Receiver<ImageState> {
        self.image.subscribe()
    }

    pub fn image_state(&self) -> ImageState {
        self.image.borrow().clone()
    }

    /// Download the portrait. The outcome is both returned and published.
    ///
    /// Dropping the returned future abandons the download; the published state
    /// then stays `Loading` until the next call.
    pub async fn load_image(&self, transport: &dyn HttpTransport) -> Result<Bytes, ImageError> {
        let url = &self.item.image_url;
        if url::Url::parse(url).is_err() {
            return Err(self.fail(ImageError::InvalidUrl(url.clone())));
        }

        self.image.send_replace(ImageState::Loading);
        debug!(id = self.item.id, url = %url, "loading portrait");

        let response = match transport.request(&HttpRequest::get(url.as_str())).await {
            Ok(response) => response,
            Err(FetchError::Network(err)) => return Err(self.fail(ImageError::Transfer(err.description()))),
            Err(FetchError::Transport(msg)) => return Err(self.fail(ImageError::Transfer(msg))),
        };
        if !response.is_success() {
            return Err(self.fail(ImageError::BadStatusCode(response.status)));
        }
        match response.body.filter(|body| !body.is_empty()) {
            Some(bytes) => {
                self.image.send_replace(ImageState::Loaded(bytes.clone()));
                Ok(bytes)
            }
            None => Err(self.fail(ImageError::Empty)),
        }
    }

    fn fail(&self, err: ImageError) -> ImageError {
        warn!(id = self.item.id, error = %err, "portrait load failed");
        self.image.send_replace(ImageState::Failed(err.to_string()));
        err
    }
}
