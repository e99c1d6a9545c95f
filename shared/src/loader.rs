//! Tour loading: concurrent fetch, failure isolation, ordering.

use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::dates::DateKey;
use crate::hydrator::Hydrator;
use crate::{Error, Result, Show, Tour, TourLocation, ToursConfig};

/// Somewhere tour documents can be fetched from by name.
#[async_trait]
pub trait TourSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<Tour>;
}

/// Tour documents served over HTTP under `<base_url>/<data_path>/`.
pub struct HttpTourSource {
    http_client: reqwest::Client,
    base_url: String,
    data_path: String,
}

impl HttpTourSource {
    pub fn new(http_client: reqwest::Client, base_url: &str, data_path: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            data_path: data_path.trim_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        if self.data_path.is_empty() {
            format!("{}/{}", self.base_url, urlencoding::encode(name))
        } else {
            format!("{}/{}/{}", self.base_url, self.data_path, urlencoding::encode(name))
        }
    }
}

#[async_trait]
impl TourSource for HttpTourSource {
    async fn fetch(&self, name: &str) -> Result<Tour> {
        let url = self.url_for(name);
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Tour documents read from a local directory.
pub struct DirTourSource {
    dir: PathBuf,
}

impl DirTourSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TourSource for DirTourSource {
    async fn fetch(&self, name: &str) -> Result<Tour> {
        let bytes = tokio::fs::read(self.dir.join(name)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Build the source described by the configuration.
pub fn source_from_config(config: &ToursConfig, http_client: reqwest::Client) -> Box<dyn TourSource> {
    match &config.location {
        TourLocation::Remote { base_url, data_path } => {
            Box::new(HttpTourSource::new(http_client, base_url, data_path))
        }
        TourLocation::Directory(dir) => Box::new(DirTourSource::new(dir)),
    }
}

/// Fetch every named tour concurrently and return the ones that loaded,
/// hydrated and ordered by earliest show.
///
/// A resource that fails to load is logged and dropped; it never aborts the batch.
pub async fn load_tours(
    source: &dyn TourSource,
    names: &[String],
    hydrator: Option<&Hydrator>,
) -> Vec<Tour> {
    let results = join_all(names.iter().map(|name| async move {
        (name, source.fetch(name).await)
    }))
    .await;

    let mut tours: Vec<Tour> = results
        .into_iter()
        .filter_map(|(name, result)| match result {
            Ok(tour) => Some(tour),
            Err(Error::Status { status, url }) => {
                warn!("Failed to load tour file {}: HTTP {} from {}", name, status, url);
                None
            }
            Err(e) => {
                error!("Error loading tour file {}: {}", name, e);
                None
            }
        })
        .collect();

    for tour in &mut tours {
        tour.normalize();
    }

    if let Some(hydrator) = hydrator {
        join_all(
            tours
                .iter_mut()
                .filter(|tour| tour.attraction_id().is_some())
                .map(|tour| hydrator.hydrate(tour)),
        )
        .await;
    }

    for tour in &mut tours {
        sort_shows(&mut tour.shows);
    }
    sort_tours(&mut tours);
    warn_duplicate_slugs(&tours);

    info!("Loaded {} of {} tours", tours.len(), names.len());
    tours
}

/// Sort shows ascending by local calendar date.
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by_cached_key(|show| DateKey::of(&show.date));
}

/// Earliest show key, or `None` for a tour with no shows.
fn earliest_show(tour: &Tour) -> Option<DateKey> {
    tour.shows.first().map(|show| DateKey::of(&show.date))
}

/// Sort tours by earliest show; tours without shows go last.
pub fn sort_tours(tours: &mut [Tour]) {
    tours.sort_by_cached_key(|tour| match earliest_show(tour) {
        Some(key) => (false, Some(key)),
        None => (true, None),
    });
}

fn warn_duplicate_slugs(tours: &[Tour]) {
    let mut seen = HashSet::new();
    for tour in tours {
        let slug = tour.slug();
        if !seen.insert(slug.clone()) {
            warn!("Duplicate tour slug {:?}; only the first is reachable by address", slug);
        } else {
            debug!("Tour {:?} has {} shows", slug, tour.shows.len());
        }
    }
}
