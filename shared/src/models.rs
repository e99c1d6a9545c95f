//! Tour and show data models.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::slug::slugify;

/// Where a tour's shows come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Shows fetched live through the events proxy
    Ticketmaster,
    /// Shows authored in the tour document; also any unrecognized value
    #[default]
    #[serde(other)]
    Static,
}

/// Row layout used when rendering a tour's shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Primary line is the match-up title, secondary line the city only
    Matchup,
    #[default]
    #[serde(other)]
    Standard,
}

/// External event source settings carried by a hydrated tour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSource {
    #[serde(default)]
    pub attraction_id: Option<String>,
    /// Venue id or venue name mapped to a preferred venue slug
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue_slug_overrides: HashMap<String, String>,
}

/// A touring campaign and its shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    #[serde(default)]
    pub tour_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tour_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: SourceKind,
    #[serde(default, rename = "ticketmaster", skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalSource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display: DisplayMode,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shows: Vec<Show>,
}

impl Tour {
    /// URL and artwork key: `tourId` when present, else the slugified name.
    pub fn slug(&self) -> String {
        match self.tour_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ if !self.tour_name.trim().is_empty() => slugify(&self.tour_name),
            _ => slugify("tour"),
        }
    }

    /// Attraction id when this tour should be hydrated from the events proxy.
    pub fn attraction_id(&self) -> Option<&str> {
        if self.source != SourceKind::Ticketmaster {
            return None;
        }
        self.external
            .as_ref()
            .and_then(|e| e.attraction_id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Region label for the detail header, falling back to the note.
    pub fn region_or_note(&self) -> &str {
        if self.region.is_empty() {
            &self.note
        } else {
            &self.region
        }
    }

    /// Fold legacy show fields into their canonical names.
    pub fn normalize(&mut self) {
        for show in &mut self.shows {
            show.normalize();
        }
    }
}

/// Named links offered for a show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city_guide: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rideshare: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concessions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
}

/// One date and venue within a tour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    /// Legacy name for `region`
    #[serde(default, rename = "state", skip_serializing, deserialize_with = "null_as_default")]
    pub legacy_state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchup: Option<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: ShowLinks,
}

impl Show {
    pub fn normalize(&mut self) {
        if self.region.is_empty() && !self.legacy_state.is_empty() {
            self.region = std::mem::take(&mut self.legacy_state);
        }
    }

    /// Purchase link, preferring the show-level url over `links.ticketUrl`.
    pub fn purchase_url(&self) -> Option<&str> {
        self.ticket_url
            .as_deref()
            .or(self.links.ticket_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Title for the match-up row layout.
    pub fn matchup_label(&self) -> &str {
        [&self.matchup, &self.match_label, &self.title]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|label| !label.is_empty())
            .unwrap_or("Match")
    }
}

/// Read `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
