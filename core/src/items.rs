//! Read-only display projections of `Character` for list rows.

use std::hash::{Hash, Hasher};

use crate::types::{Character, Status};

/// Semantic color for a status badge. The host maps it onto its palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    Green,
    Red,
    Gray,
}

impl From<Status> for StatusColor {
    fn from(status: Status) -> Self {
        match status {
            Status::Alive => StatusColor::Green,
            Status::Dead => StatusColor::Red,
            Status::Unknown => StatusColor::Gray,
        }
    }
}

/// One row of the character list.
///
/// Identity is the character id: two items with the same id compare equal
/// even if other fields differ, which is what list diffing needs.
#[derive(Debug, Clone)]
pub struct CharacterListItem {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    pub image_url: String,
    pub status_color: StatusColor,
}

impl From<&Character> for CharacterListItem {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            status: character.status.as_str().to_string(),
            species: character.species.clone(),
            image_url: character.image.clone(),
            status_color: character.status.into(),
        }
    }
}

impl PartialEq for CharacterListItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CharacterListItem {}

impl Hash for CharacterListItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::fixtures::character;

    #[test]
    fn projects_record_fields() {
        let item = CharacterListItem::from(&character(1, "Rick Sanchez", Status::Alive));
        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Rick Sanchez");
        assert_eq!(item.status, "Alive");
        assert_eq!(item.species, "Human");
        assert_eq!(
            item.image_url,
            "https://rickandmortyapi.com/api/character/avatar/1.jpeg"
        );
        assert_eq!(item.status_color, StatusColor::Green);
    }

    #[test]
    fn status_colors() {
        assert_eq!(StatusColor::from(Status::Alive), StatusColor::Green);
        assert_eq!(StatusColor::from(Status::Dead), StatusColor::Red);
        assert_eq!(StatusColor::from(Status::Unknown), StatusColor::Gray);
    }

    #[test]
    fn identity_is_the_id() {
        let a = CharacterListItem::from(&character(7, "Before", Status::Alive));
        let b = CharacterListItem::from(&character(7, "After", Status::Dead));
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }
}
