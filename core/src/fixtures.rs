//! Shared test records.

use crate::types::{Character, CharacterPage, Location, PageInfo, Status};

pub(crate) fn character(id: i64, name: &str, status: Status) -> Character {
    Character {
        id,
        name: name.to_string(),
        status,
        species: "Human".to_string(),
        kind: String::new(),
        gender: "Male".to_string(),
        origin: Location {
            name: "Earth (C-137)".to_string(),
            url: "https://rickandmortyapi.com/api/location/1".to_string(),
        },
        location: Location {
            name: "Citadel of Ricks".to_string(),
            url: "https://rickandmortyapi.com/api/location/3".to_string(),
        },
        image: format!("https://rickandmortyapi.com/api/character/avatar/{id}.jpeg"),
        episode: Vec::new(),
        url: format!("https://rickandmortyapi.com/api/character/{id}"),
        created: "2017-11-04T18:48:46.250Z".to_string(),
    }
}

pub(crate) fn page(next: Option<&str>, results: Vec<Character>) -> CharacterPage {
    CharacterPage {
        info: PageInfo {
            next: next.map(str::to_string),
            ..PageInfo::default()
        },
        results,
    }
}
