//! Pagination, search and filter state of the character list.
//!
//! # Design
//! `CharacterListState` is a plain value with pure transitions. It performs
//! no IO and knows nothing about tasks; the list controller is its only
//! mutator. The one invariant every transition upholds: changing the search
//! query or the status filter resets pagination (page 1, no records, more
//! pages assumed) before anything fetches again.

use crate::items::CharacterListItem;
use crate::types::{Character, CharacterPage, Status};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterListState {
    /// Accumulated records in arrival order. Not deduplicated.
    pub characters: Vec<Character>,
    /// Next page to request; starts at 1.
    pub current_page: u32,
    pub has_more: bool,
    pub is_loading: bool,
    pub search_query: String,
    pub status_filter: Option<Status>,
}

impl Default for CharacterListState {
    fn default() -> Self {
        Self {
            characters: Vec::new(),
            current_page: 1,
            has_more: true,
            is_loading: false,
            search_query: String::new(),
            status_filter: None,
        }
    }
}

impl CharacterListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_search_active(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Name to send with the next request, if searching.
    pub fn request_name(&self) -> Option<&str> {
        self.is_search_active().then_some(self.search_query.as_str())
    }

    pub fn reset_pagination(&mut self) {
        self.current_page = 1;
        self.has_more = true;
        self.characters.clear();
    }

    /// Append one page of records and advance the page counter.
    /// `has_more` is left to the caller.
    pub fn append_characters(&mut self, characters: Vec<Character>) {
        self.characters.extend(characters);
        self.current_page += 1;
    }

    /// Apply a fetched envelope: `has_more` follows `info.next`, then the
    /// results are appended.
    pub fn apply_page(&mut self, page: CharacterPage) {
        self.has_more = page.has_next();
        self.append_characters(page.results);
    }

    pub fn update_search_query(&mut self, query: &str) {
        if query != self.search_query {
            self.reset_pagination();
        }
        self.search_query = query.to_string();
    }

    /// Set the filter. Pagination is reset only when the filter changes;
    /// re-selecting the active filter keeps the loaded pages.
    pub fn update_status_filter(&mut self, status: Option<Status>) {
        if status != self.status_filter {
            self.status_filter = status;
            self.reset_pagination();
        }
    }

    pub fn reset_search(&mut self) {
        if !self.search_query.is_empty() {
            self.search_query.clear();
            self.reset_pagination();
        }
    }

    pub fn reset_filters(&mut self) {
        if self.status_filter.is_some() {
            self.status_filter = None;
            self.reset_pagination();
        }
    }

    pub fn list_items(&self) -> Vec<CharacterListItem> {
        self.characters.iter().map(CharacterListItem::from).collect()
    }

    pub fn find(&self, id: i64) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{character, page};

    fn loaded_state() -> CharacterListState {
        let mut state = CharacterListState::new();
        state.append_characters(vec![character(1, "Rick Sanchez", Status::Alive)]);
        state.has_more = false;
        state
    }

    fn assert_reset(state: &CharacterListState) {
        assert_eq!(state.current_page, 1);
        assert!(state.has_more);
        assert!(state.characters.is_empty());
    }

    #[test]
    fn starts_on_first_page() {
        let state = CharacterListState::new();
        assert_reset(&state);
        assert!(!state.is_loading);
        assert!(!state.is_search_active());
        assert_eq!(state.request_name(), None);
    }

    #[test]
    fn append_preserves_order_and_advances_page() {
        let mut state = CharacterListState::new();
        state.append_characters(vec![
            character(1, "Rick Sanchez", Status::Alive),
            character(2, "Morty Smith", Status::Alive),
        ]);
        state.append_characters(vec![character(3, "Summer Smith", Status::Alive)]);

        let ids: Vec<_> = state.characters.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(state.current_page, 3);
        assert!(state.has_more, "append leaves has_more alone");
    }

    #[test]
    fn append_keeps_duplicates() {
        let mut state = CharacterListState::new();
        state.append_characters(vec![character(1, "Rick Sanchez", Status::Alive)]);
        state.append_characters(vec![character(1, "Rick Sanchez", Status::Alive)]);
        assert_eq!(state.characters.len(), 2);
    }

    #[test]
    fn apply_page_with_next() {
        let mut state = CharacterListState::new();
        state.apply_page(page(
            Some("https://rickandmortyapi.com/api/character?page=2"),
            vec![character(1, "Rick Sanchez", Status::Alive)],
        ));
        assert!(state.has_more);
        assert_eq!(state.current_page, 2);
        assert_eq!(state.characters[0].name, "Rick Sanchez");
    }

    #[test]
    fn apply_last_empty_page() {
        let mut state = CharacterListState::new();
        state.apply_page(page(None, Vec::new()));
        assert!(!state.has_more);
        assert!(state.characters.is_empty());
    }

    #[test]
    fn same_query_keeps_pagination() {
        let mut state = loaded_state();
        state.search_query = "rick".to_string();
        state.update_search_query("rick");
        assert_eq!(state.current_page, 2);
        assert_eq!(state.characters.len(), 1);
        assert!(!state.has_more);
    }

    #[test]
    fn different_query_resets_pagination() {
        let mut state = loaded_state();
        state.update_search_query("morty");
        assert_reset(&state);
        assert_eq!(state.search_query, "morty");
        assert_eq!(state.request_name(), Some("morty"));
    }

    #[test]
    fn changed_filter_resets_pagination() {
        let mut state = loaded_state();
        state.update_status_filter(Some(Status::Dead));
        assert_reset(&state);
        assert_eq!(state.status_filter, Some(Status::Dead));
    }

    #[test]
    fn reselected_filter_keeps_pagination() {
        let mut state = loaded_state();
        state.status_filter = Some(Status::Alive);
        state.update_status_filter(Some(Status::Alive));
        assert_eq!(state.current_page, 2);
        assert_eq!(state.characters.len(), 1);
    }

    #[test]
    fn reset_search_only_when_active() {
        let mut state = loaded_state();
        state.reset_search();
        assert_eq!(state.current_page, 2, "no query, nothing to reset");

        state.search_query = "rick".to_string();
        state.reset_search();
        assert_reset(&state);
        assert!(!state.is_search_active());
    }

    #[test]
    fn reset_filters_only_when_set() {
        let mut state = loaded_state();
        state.reset_filters();
        assert_eq!(state.current_page, 2, "no filter, nothing to reset");

        state.status_filter = Some(Status::Unknown);
        state.reset_filters();
        assert_reset(&state);
        assert_eq!(state.status_filter, None);
    }

    #[test]
    fn find_and_project() {
        let state = loaded_state();
        assert_eq!(state.find(1).map(|c| c.name.as_str()), Some("Rick Sanchez"));
        assert!(state.find(2).is_none());
        assert_eq!(state.list_items().len(), 1);
    }
}
