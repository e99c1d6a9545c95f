//! View routing between the library and a single tour.
//!
//! The address is the source of truth: the `tour` query parameter holds the
//! selected tour's slug, and `AppState::view` is a cache of it. Navigation is
//! reached through the [`Navigator`] capability so the state machine runs
//! without a browser.

use tracing::debug;
use url::Url;

use crate::state::{AppState, View};

/// Query parameter carrying the selected tour's slug.
pub const TOUR_PARAM: &str = "tour";

/// Address history as seen by the router.
pub trait Navigator {
    /// Tour key of the current address.
    fn current(&self) -> Option<String>;
    /// Push a new history entry, with or without a tour key.
    fn push(&mut self, tour_key: Option<&str>);
}

/// Tour key carried by an address, absolute or relative.
pub fn tour_key_from_address(address: &str) -> Option<String> {
    let parsed = Url::parse(address).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(address))
    });
    parsed
        .ok()?
        .query_pairs()
        .find(|(key, _)| key == TOUR_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// In-memory history with back and forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<Option<String>>,
    cursor: usize,
}

impl MemoryHistory {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn from_address(address: &str) -> Self {
        Self::new(tour_key_from_address(address))
    }

    /// Step back one entry; false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry; false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Navigator for MemoryHistory {
    fn current(&self) -> Option<String> {
        self.entries.get(self.cursor).cloned().flatten()
    }

    fn push(&mut self, tour_key: Option<&str>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(tour_key.map(str::to_string));
        self.cursor = self.entries.len() - 1;
    }
}

/// Library / Detail state machine.
pub struct Router<N: Navigator> {
    navigator: N,
}

impl<N: Navigator> Router<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Start in the library, then follow whatever the current address says.
    pub fn init(&self, state: &mut AppState) {
        show_library(state);
        self.on_address_change(state);
    }

    /// Select a tour from the list or a search result.
    pub fn select(&mut self, state: &mut AppState, index: usize) {
        let Some(tour) = state.tours.get(index) else {
            return;
        };
        let slug = tour.slug();
        self.navigator.push(Some(&slug));
        show_detail(state, index);
        state.search.dismiss();
    }

    /// Choose the search result at `position`.
    pub fn select_search_result(&mut self, state: &mut AppState, position: usize) {
        let Some(index) = state.search.result(position) else {
            return;
        };
        self.select(state, index);
        state.search.query = state.tours[index].tour_name.clone();
    }

    /// Explicit back-to-library action.
    pub fn back(&mut self, state: &mut AppState) {
        self.navigator.push(None);
        show_library(state);
    }

    /// Re-derive the view from the address after a back/forward navigation.
    ///
    /// A key that matches no loaded tour falls back to the library silently.
    pub fn on_address_change(&self, state: &mut AppState) {
        let target = self
            .navigator
            .current()
            .and_then(|slug| state.find_by_slug(&slug));

        match target {
            Some(index) => show_detail(state, index),
            None => show_library(state),
        }
        debug!("Address change resolved to {:?}", state.view);
    }
}

fn show_detail(state: &mut AppState, index: usize) {
    state.view = View::Detail { tour: index };
    state.library_visible = false;
    state.close_panels();
}

fn show_library(state: &mut AppState) {
    state.view = View::Library;
    state.library_visible = true;
    state.close_panels();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render, RenderOptions};
    use crate::{Show, Tour};

    fn tours() -> Vec<Tour> {
        ["Forever Tour", "The Mayhem Ball", "Wishbone World Tour"]
            .iter()
            .enumerate()
            .map(|(i, name)| Tour {
                tour_name: name.to_string(),
                artist: format!("Artist {}", i),
                shows: vec![Show {
                    date: format!("2026-0{}-01", i + 1),
                    venue_name: format!("Venue {}", i),
                    ..Default::default()
                }],
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_tour_key_from_address() {
        assert_eq!(
            tour_key_from_address("https://concerto.live/tours?tour=the-mayhem-ball&utm=x").as_deref(),
            Some("the-mayhem-ball")
        );
        assert_eq!(tour_key_from_address("/tours?tour=forever-tour").as_deref(), Some("forever-tour"));
        assert_eq!(tour_key_from_address("?tour=a%20b").as_deref(), Some("a b"));
        assert_eq!(tour_key_from_address("/tours?tour="), None);
        assert_eq!(tour_key_from_address("/tours"), None);
    }

    #[test]
    fn test_init_from_deep_link() {
        let mut state = AppState::new(tours());
        let router = Router::new(MemoryHistory::from_address("/?tour=the-mayhem-ball"));
        router.init(&mut state);
        assert_eq!(state.view, View::Detail { tour: 1 });
        assert!(!state.library_visible);
    }

    #[test]
    fn test_init_unknown_key_stays_in_library() {
        let mut state = AppState::new(tours());
        let router = Router::new(MemoryHistory::from_address("/?tour=not-a-tour"));
        router.init(&mut state);
        assert_eq!(state.view, View::Library);
        assert!(state.library_visible);
    }

    #[test]
    fn test_select_then_browser_back_restores_library() {
        let mut state = AppState::new(tours());
        let mut router = Router::new(MemoryHistory::new(None));
        router.init(&mut state);

        router.select(&mut state, 2);
        assert_eq!(router.navigator().current().as_deref(), Some("wishbone-world-tour"));
        assert_eq!(state.view, View::Detail { tour: 2 });
        assert!(!state.library_visible);

        assert!(router.navigator_mut().back());
        router.on_address_change(&mut state);
        assert_eq!(state.view, View::Library);
        assert!(state.library_visible);
        assert_eq!(state.selected_tour(), None);

        assert!(router.navigator_mut().forward());
        router.on_address_change(&mut state);
        assert_eq!(state.view, View::Detail { tour: 2 });
    }

    #[test]
    fn test_detail_to_detail_and_back_action() {
        let mut state = AppState::new(tours());
        let mut router = Router::new(MemoryHistory::new(None));
        router.init(&mut state);

        router.select(&mut state, 0);
        state.toggle_show(0);
        router.select(&mut state, 1);
        assert_eq!(state.view, View::Detail { tour: 1 });
        assert_eq!(state.open_show, None);
        assert_eq!(router.navigator().len(), 3);

        router.back(&mut state);
        assert_eq!(state.view, View::Library);
        assert_eq!(router.navigator().current(), None);
        assert_eq!(router.navigator().len(), 4);

        // Browser back from the pushed library entry lands on the previous tour.
        router.navigator_mut().back();
        router.on_address_change(&mut state);
        assert_eq!(state.view, View::Detail { tour: 1 });
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut history = MemoryHistory::new(None);
        history.push(Some("a"));
        history.push(Some("b"));
        history.back();
        history.push(Some("c"));
        assert_eq!(history.len(), 3);
        assert!(!history.forward());
        assert_eq!(history.current().as_deref(), Some("c"));
    }

    #[test]
    fn test_selecting_same_tour_twice_renders_identically() {
        let mut state = AppState::new(tours());
        let mut router = Router::new(MemoryHistory::new(None));
        let options = RenderOptions::default();
        router.init(&mut state);

        router.select(&mut state, 1);
        let first = render(&state, &options);
        router.back(&mut state);
        router.select(&mut state, 1);
        let second = render(&state, &options);

        assert_eq!(first, second);
        assert!(first.detail.is_some());
    }

    #[test]
    fn test_search_result_selects_tour() {
        let mut state = AppState::new(tours());
        let mut router = Router::new(MemoryHistory::new(None));
        router.init(&mut state);

        state.update_search("mayhem");
        assert!(state.search.visible);
        router.select_search_result(&mut state, 0);

        assert_eq!(state.view, View::Detail { tour: 1 });
        assert_eq!(state.search.query, "The Mayhem Ball");
        assert!(!state.search.visible);
        assert_eq!(router.navigator().current().as_deref(), Some("the-mayhem-ball"));
    }
}
