//! Domain DTOs for the character API.
//!
//! # Design
//! These types mirror the JSON served by `/character` but are defined
//! independently from the mock-server crate; the end-to-end tests catch any
//! schema drift between the two. Records are immutable once decoded: list and
//! detail items are projections built from them, never mutated copies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Life status of a character, serialized exactly as the API spells it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    #[serde(rename = "Alive")]
    Alive,
    #[serde(rename = "Dead")]
    Dead,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Status {
    /// Canonical query-string and label form.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Alive => "Alive",
            Status::Dead => "Dead",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named place with its API reference URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub url: String,
}

/// A single character record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub status: Status,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: Location,
    pub location: Location,
    pub image: String,
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

/// Pagination metadata. Only `next` drives behavior; the rest is kept for
/// hosts that want to show totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub pages: Option<u32>,
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// One page of characters: the top-level JSON envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl CharacterPage {
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }
}

/// Error body the API sends alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_api_spelling() {
        assert_eq!(serde_json::to_value(Status::Alive).unwrap(), "Alive");
        assert_eq!(serde_json::to_value(Status::Dead).unwrap(), "Dead");
        assert_eq!(serde_json::to_value(Status::Unknown).unwrap(), "unknown");
        let parsed: Status = serde_json::from_str(r#""unknown""#).unwrap();
        assert_eq!(parsed, Status::Unknown);
    }

    #[test]
    fn status_rejects_other_casing() {
        let result: Result<Status, _> = serde_json::from_str(r#""Unknown""#);
        assert!(result.is_err());
    }

    #[test]
    fn page_info_tolerates_missing_totals() {
        let info: PageInfo = serde_json::from_str(r#"{"next":null}"#).unwrap();
        assert_eq!(info, PageInfo::default());
    }

    #[test]
    fn character_maps_type_field() {
        let json = r#"{
            "id": 2, "name": "Morty Smith", "status": "Alive", "species": "Human",
            "type": "Clone", "gender": "Male",
            "origin": {"name": "unknown", "url": ""},
            "location": {"name": "Citadel of Ricks", "url": "https://rickandmortyapi.com/api/location/3"},
            "image": "https://rickandmortyapi.com/api/character/avatar/2.jpeg",
            "episode": [], "url": "https://rickandmortyapi.com/api/character/2",
            "created": "2017-11-04T18:50:21.651Z"
        }"#;
        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.kind, "Clone");
        assert_eq!(character.location.name, "Citadel of Ricks");
        let back = serde_json::to_value(&character).unwrap();
        assert_eq!(back["type"], "Clone");
    }
}
