//! Per-page application state.

use serde::Serialize;

use crate::search::SearchState;
use crate::Tour;

/// Which view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum View {
    Library,
    /// Index into `AppState::tours`
    Detail { tour: usize },
}

/// Everything one page view knows: loaded tours, selection, open panel and search box.
#[derive(Debug, Clone)]
pub struct AppState {
    pub tours: Vec<Tour>,
    pub view: View,
    pub library_visible: bool,
    /// The single expanded show row, if any
    pub open_show: Option<usize>,
    pub search: SearchState,
}

impl AppState {
    pub fn new(tours: Vec<Tour>) -> Self {
        Self {
            tours,
            view: View::Library,
            library_visible: true,
            open_show: None,
            search: SearchState::default(),
        }
    }

    pub fn selected_tour(&self) -> Option<&Tour> {
        match self.view {
            View::Detail { tour } => self.tours.get(tour),
            View::Library => None,
        }
    }

    /// First tour whose slug equals `slug`.
    pub fn find_by_slug(&self, slug: &str) -> Option<usize> {
        self.tours.iter().position(|tour| tour.slug() == slug)
    }

    /// Open the row at `index`, closing any other; toggling the open row closes it.
    pub fn toggle_show(&mut self, index: usize) {
        let in_range = self
            .selected_tour()
            .is_some_and(|tour| index < tour.shows.len());
        if !in_range {
            return;
        }
        self.open_show = if self.open_show == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Close every expanded row (a click outside any row).
    pub fn close_panels(&mut self) {
        self.open_show = None;
    }

    pub fn update_search(&mut self, input: &str) {
        self.search.update(&self.tours, input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Show;

    fn state_with_detail() -> AppState {
        let tour = Tour {
            tour_id: Some("t".into()),
            shows: vec![Show::default(), Show::default(), Show::default()],
            ..Default::default()
        };
        let mut state = AppState::new(vec![tour]);
        state.view = View::Detail { tour: 0 };
        state
    }

    #[test]
    fn test_only_one_panel_open() {
        let mut state = state_with_detail();
        state.toggle_show(0);
        assert_eq!(state.open_show, Some(0));
        state.toggle_show(1);
        assert_eq!(state.open_show, Some(1));
        state.toggle_show(1);
        assert_eq!(state.open_show, None);
        state.toggle_show(2);
        state.close_panels();
        assert_eq!(state.open_show, None);
    }

    #[test]
    fn test_toggle_ignores_rows_outside_detail() {
        let mut state = state_with_detail();
        state.toggle_show(7);
        assert_eq!(state.open_show, None);

        state.view = View::Library;
        state.toggle_show(0);
        assert_eq!(state.open_show, None);
    }

    #[test]
    fn test_find_by_slug_first_wins() {
        let tours = vec![
            Tour {
                tour_id: Some("dup".into()),
                artist: "first".into(),
                ..Default::default()
            },
            Tour {
                tour_name: "Dup".into(),
                artist: "second".into(),
                ..Default::default()
            },
        ];
        let state = AppState::new(tours);
        assert_eq!(state.find_by_slug("dup"), Some(0));
        assert_eq!(state.find_by_slug("nope"), None);
    }
}
