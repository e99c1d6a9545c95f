//! Tour search over the in-memory list.

use crate::Tour;

/// Indices of tours whose name or artist contains `query`, case-insensitively.
///
/// A blank query matches nothing.
pub fn search(tours: &[Tour], query: &str) -> Vec<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    tours
        .iter()
        .enumerate()
        .filter(|(_, tour)| {
            tour.tour_name.to_lowercase().contains(&needle) || tour.artist.to_lowercase().contains(&needle)
        })
        .map(|(index, _)| index)
        .collect()
}

/// Search box state, recomputed on every input change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<usize>,
    /// Results list shown; false for a blank query or no matches
    pub visible: bool,
}

impl SearchState {
    pub fn update(&mut self, tours: &[Tour], input: &str) {
        self.query = input.to_string();
        self.results = search(tours, input);
        self.visible = !self.results.is_empty();
    }

    /// Hide the results list (a click outside the search box).
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Tour index behind the result at `position`.
    pub fn result(&self, position: usize) -> Option<usize> {
        self.results.get(position).copied()
    }
}
