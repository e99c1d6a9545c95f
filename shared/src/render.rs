//! Pure rendering from [`AppState`] to a [`PageView`] tree.

use serde::Serialize;

use crate::dates::format_short_date;
use crate::state::AppState;
use crate::{DisplayMode, Show, Tour, ToursConfig};

/// Presentation settings that do not live in tour data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub image_dir: String,
    /// Tour keys drawn with the match-up row layout
    pub matchup_tours: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_dir: "./images/tours".to_string(),
            matchup_tours: vec!["fifa-world-cup-2026".to_string()],
        }
    }
}

impl From<&ToursConfig> for RenderOptions {
    fn from(config: &ToursConfig) -> Self {
        Self {
            image_dir: config.image_dir.clone(),
            matchup_tours: config.matchup_tours.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub search: SearchView,
    pub library: LibraryView,
    /// Present only while a tour is selected
    pub detail: Option<DetailView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub visible: bool,
    pub results: Vec<TourLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourLink {
    pub slug: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryView {
    pub visible: bool,
    pub items: Vec<LibraryItem>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryItem {
    pub slug: String,
    pub name: String,
    pub meta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub slug: String,
    pub name: String,
    pub artist: String,
    pub image_src: String,
    pub image_alt: String,
    pub meta: String,
    pub city_summary: Option<String>,
    pub layout: DisplayMode,
    pub shows: Vec<ShowRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowRowView {
    pub index: usize,
    pub primary: String,
    pub secondary: Option<String>,
    pub date: String,
    pub expanded: bool,
    pub actions: Vec<LinkAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkKind {
    Tickets,
    CityGuide,
    Rideshare,
    BagPolicy,
    Concessions,
    Parking,
}

impl LinkKind {
    /// Every action in display order; tickets first.
    pub const ALL: [LinkKind; 6] = [
        LinkKind::Tickets,
        LinkKind::CityGuide,
        LinkKind::Rideshare,
        LinkKind::BagPolicy,
        LinkKind::Concessions,
        LinkKind::Parking,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LinkKind::Tickets => "Buy Tickets",
            LinkKind::CityGuide => "City Guide",
            LinkKind::Rideshare => "Rideshare",
            LinkKind::BagPolicy => "Bag Policy",
            LinkKind::Concessions => "Concessions",
            LinkKind::Parking => "Parking",
        }
    }

    fn url(self, show: &Show) -> Option<&str> {
        let links = &show.links;
        let url = match self {
            LinkKind::Tickets => return show.purchase_url(),
            LinkKind::CityGuide => &links.city_guide,
            LinkKind::Rideshare => &links.rideshare,
            LinkKind::BagPolicy => &links.bag_policy,
            LinkKind::Concessions => &links.concessions,
            LinkKind::Parking => &links.parking,
        };
        url.as_deref().filter(|u| !u.is_empty())
    }
}

/// One link button; a missing url renders disabled rather than being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAction {
    pub kind: LinkKind,
    pub label: &'static str,
    pub url: Option<String>,
    pub primary: bool,
    pub enabled: bool,
}

pub fn render(state: &AppState, options: &RenderOptions) -> PageView {
    PageView {
        search: render_search(state),
        library: render_library(state),
        detail: state
            .selected_tour()
            .map(|tour| render_detail(tour, state.open_show, options)),
    }
}

fn render_search(state: &AppState) -> SearchView {
    SearchView {
        query: state.search.query.clone(),
        visible: state.search.visible,
        results: state
            .search
            .results
            .iter()
            .filter_map(|&index| state.tours.get(index))
            .map(|tour| TourLink {
                slug: tour.slug(),
                name: display_name(tour),
            })
            .collect(),
    }
}

fn render_library(state: &AppState) -> LibraryView {
    LibraryView {
        visible: state.library_visible,
        items: state
            .tours
            .iter()
            .map(|tour| LibraryItem {
                slug: tour.slug(),
                name: display_name(tour),
                meta: Some(tour.artist.trim().to_string()).filter(|m| !m.is_empty()),
            })
            .collect(),
        empty_message: state
            .tours
            .is_empty()
            .then(|| "No tours available at the moment.".to_string()),
    }
}

pub fn render_detail(tour: &Tour, open_show: Option<usize>, options: &RenderOptions) -> DetailView {
    let slug = tour.slug();
    let layout = if tour.display == DisplayMode::Matchup || options.matchup_tours.contains(&slug) {
        DisplayMode::Matchup
    } else {
        DisplayMode::Standard
    };

    DetailView {
        image_src: format!("{}/{}.jpg", options.image_dir.trim_end_matches('/'), slug),
        image_alt: if tour.tour_name.is_empty() {
            "Tour artwork".to_string()
        } else {
            tour.tour_name.clone()
        },
        slug,
        name: display_name(tour),
        artist: tour.artist.clone(),
        meta: tour_meta(tour),
        city_summary: city_summary(&tour.shows),
        layout,
        shows: tour
            .shows
            .iter()
            .enumerate()
            .map(|(index, show)| render_show(index, show, layout, open_show == Some(index)))
            .collect(),
    }
}

fn render_show(index: usize, show: &Show, layout: DisplayMode, expanded: bool) -> ShowRowView {
    let (primary, secondary) = match layout {
        DisplayMode::Matchup => (show.matchup_label().to_string(), show.city.clone()),
        DisplayMode::Standard => {
            let venue = if show.venue_name.is_empty() {
                "Venue".to_string()
            } else {
                show.venue_name.clone()
            };
            let place = [show.city.as_str(), show.region.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            (venue, place)
        }
    };

    ShowRowView {
        index,
        primary,
        secondary: Some(secondary).filter(|s| !s.trim().is_empty()),
        date: format_short_date(&show.date),
        expanded,
        actions: LinkKind::ALL
            .iter()
            .map(|&kind| {
                let url = kind.url(show).map(str::to_string);
                LinkAction {
                    kind,
                    label: kind.label(),
                    enabled: url.is_some(),
                    url,
                    primary: kind == LinkKind::Tickets,
                }
            })
            .collect(),
    }
}

fn display_name(tour: &Tour) -> String {
    if tour.tour_name.is_empty() {
        "Untitled Tour".to_string()
    } else {
        tour.tour_name.clone()
    }
}

/// `"12 shows · 2026 · North America"`, skipping empty parts.
pub fn tour_meta(tour: &Tour) -> String {
    let count = tour.shows.len();
    let mut bits = Vec::new();
    if count > 0 {
        bits.push(format!("{} show{}", count, if count > 1 { "s" } else { "" }));
    }
    if !tour.year.is_empty() {
        bits.push(tour.year.clone());
    }
    if !tour.region_or_note().is_empty() {
        bits.push(tour.region_or_note().to_string());
    }
    bits.join(" · ")
}

/// Unique cities in show order; more than four collapse to three plus a count.
pub fn city_summary(shows: &[Show]) -> Option<String> {
    let mut cities: Vec<&str> = Vec::new();
    for show in shows {
        if !show.city.is_empty() && !cities.contains(&show.city.as_str()) {
            cities.push(&show.city);
        }
    }
    match cities.len() {
        0 => None,
        1..=4 => Some(cities.join(" · ")),
        n => Some(format!("{} · +{} more", cities[..3].join(" · "), n - 3)),
    }
}
