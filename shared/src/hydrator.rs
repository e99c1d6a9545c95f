//! Event hydration: replaces a tour's shows with live events fetched through
//! the events proxy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::loader::sort_shows;
use crate::slug::slugify;
use crate::{Error, LinkBases, Result, Show, ShowLinks, Tour};

/// Upstream event record as returned by the Discovery API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dates: Option<EventDates>,
    #[serde(default, rename = "_embedded")]
    pub embedded: Option<EventEmbedded>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventDates {
    #[serde(default)]
    pub start: Option<EventStart>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStart {
    #[serde(default)]
    pub local_date: Option<String>,
    #[serde(default)]
    pub local_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventEmbedded {
    #[serde(default)]
    pub venues: Vec<Venue>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Venue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<Named>,
    #[serde(default)]
    pub state: Option<Subdivision>,
    #[serde(default)]
    pub country: Option<Country>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subdivision {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

/// Response envelope shared by the proxy and its callers.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EventsEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub events: Vec<T>,
}

/// Anything that can list events for an attraction.
#[async_trait]
pub trait EventsClient: Send + Sync {
    async fn fetch_events(&self, attraction_id: &str) -> Result<Vec<Event>>;
}

/// Calls the events proxy endpoint.
pub struct ProxyEventsClient {
    http_client: reqwest::Client,
    proxy_url: String,
}

impl ProxyEventsClient {
    pub fn new(http_client: reqwest::Client, proxy_url: impl Into<String>) -> Self {
        Self {
            http_client,
            proxy_url: proxy_url.into(),
        }
    }
}

#[async_trait]
impl EventsClient for ProxyEventsClient {
    async fn fetch_events(&self, attraction_id: &str) -> Result<Vec<Event>> {
        let response = self
            .http_client
            .get(&self.proxy_url)
            .query(&[("attractionId", attraction_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url: self.proxy_url.clone(),
            });
        }

        let envelope: EventsEnvelope<Event> = response.json().await?;
        Ok(envelope.events)
    }
}

/// Maps proxy events into shows for externally sourced tours.
pub struct Hydrator {
    client: Box<dyn EventsClient>,
    link_bases: LinkBases,
}

impl Hydrator {
    pub fn new(client: Box<dyn EventsClient>, link_bases: LinkBases) -> Self {
        Self { client, link_bases }
    }

    /// Replace `tour.shows` with live events.
    ///
    /// Failures are logged and leave the existing shows in place. Tours that
    /// are not externally sourced are untouched.
    pub async fn hydrate(&self, tour: &mut Tour) {
        let Some(attraction_id) = tour.attraction_id().map(str::to_string) else {
            return;
        };

        let events = match self.client.fetch_events(&attraction_id).await {
            Ok(events) => events,
            Err(e) => {
                error!("Hydration failed for tour {} ({}): {}", tour.slug(), attraction_id, e);
                return;
            }
        };

        let empty = HashMap::new();
        let overrides = tour
            .external
            .as_ref()
            .map(|e| &e.venue_slug_overrides)
            .unwrap_or(&empty);

        let received = events.len();
        let mut shows: Vec<Show> = events
            .iter()
            .filter_map(|event| map_event(event, overrides, &self.link_bases))
            .collect();
        sort_shows(&mut shows);

        if shows.len() < received {
            warn!(
                "Discarded {} of {} events for tour {} missing a date or venue",
                received - shows.len(),
                received,
                tour.slug()
            );
        }

        if tour.year.is_empty() {
            if let Some(first) = shows.first() {
                tour.year = first.date.chars().take(4).collect();
            }
        }

        info!("Hydrated tour {} with {} shows", tour.slug(), shows.len());
        tour.shows = shows;
    }
}

/// Map one upstream event into a show; events without a date or venue name are dropped.
pub fn map_event(event: &Event, overrides: &HashMap<String, String>, link_bases: &LinkBases) -> Option<Show> {
    let date = event
        .dates
        .as_ref()
        .and_then(|d| d.start.as_ref())
        .and_then(|s| s.local_date.clone())
        .filter(|d| !d.is_empty())?;

    let venue = event.embedded.as_ref().and_then(|e| e.venues.first())?;
    let venue_name = venue.name.clone().filter(|n| !n.is_empty())?;

    let city = venue.city.as_ref().and_then(|c| c.name.clone()).unwrap_or_default();
    let region = venue
        .state
        .as_ref()
        .and_then(|s| s.state_code.clone().or_else(|| s.name.clone()))
        .unwrap_or_default();
    let country = venue
        .country
        .as_ref()
        .and_then(|c| c.country_code.clone().or_else(|| c.name.clone()))
        .unwrap_or_default();

    let venue_slug = venue_slug(venue.id.as_deref(), &venue_name, overrides);
    let ticket_url = event.url.clone().filter(|u| !u.is_empty());

    let mut links = venue_links(&venue_slug, link_bases);
    links.ticket_url = ticket_url.clone();

    Some(Show {
        date,
        venue_name,
        city,
        region,
        country,
        venue_slug,
        ticket_url,
        links,
        ..Default::default()
    })
}

/// Override by venue id, then venue name, else the slugified name.
pub fn venue_slug(venue_id: Option<&str>, venue_name: &str, overrides: &HashMap<String, String>) -> String {
    venue_id
        .and_then(|id| overrides.get(id))
        .or_else(|| overrides.get(venue_name))
        .cloned()
        .unwrap_or_else(|| slugify(venue_name))
}

/// Template the five venue links with `venue=<slug>`.
pub fn venue_links(venue_slug: &str, link_bases: &LinkBases) -> ShowLinks {
    if venue_slug.is_empty() {
        return ShowLinks::default();
    }
    let link = |base: &str| {
        let separator = if base.contains('?') { '&' } else { '?' };
        Some(format!("{}{}venue={}", base, separator, urlencoding::encode(venue_slug)))
    };
    ShowLinks {
        ticket_url: None,
        city_guide: link(&link_bases.city_guide),
        rideshare: link(&link_bases.rideshare),
        bag_policy: link(&link_bases.bag_policy),
        concessions: link(&link_bases.concessions),
        parking: link(&link_bases.parking),
    }
}
