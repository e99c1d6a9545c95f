//! Configuration management for the tour Lambda functions.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

/// Tour documents served by default, in the order they are fetched.
pub const DEFAULT_TOUR_FILES: &[&str] = &[
    "backstreet-boys-into-the-millenium-sphere-las-vegas.json",
    "halsey-back-to-the-badlands-tour.json",
    "hilary-duff-small-rooms-big-nerves-tour.json",
    "jessie-j-no-secrets-tour.json",
    "lady-gaga-the-mayhem-ball-na-2026.json",
    "conan-gray-wishbone-world-tour-na.json",
    "alex-warren-little-orphan-alex-live.json",
    "ariana-grande-the-eternal-sunshine-tour-na-2026.json",
    "ed-sheeran-the-loop-tour-na-2026.json",
    "fifa-world-cup-2026.json",
    "olivia-dean-the-art-of-loving-tour.json",
    "demi-lovato-its-not-that-deep-tour.json",
    "bruno-mars-the-romantic-tour.json",
    "journey-final-frontier-tour.json",
    "bon-jovi-forever-tour.json",
    "rush-fifty-something-tour.json",
    "my-chemical-romance-the-black-parade-tour.json",
    "chris-stapleton-all-american-road-show-tour.json",
    "cardi-b-little-miss-drama-tour.json",
    "hayley-williams-at-a-bachelorette-party-tour.json",
    "florence-the-machine-everybody-scream-tour.json",
    "louis-tomlinson-how-did-we-get-here-world-tour.json",
    "charlie-puth-whatevers-clever-world-tour.json",
];

pub const DEFAULT_TICKETMASTER_URL: &str = "https://app.ticketmaster.com/discovery/v2/events.json";

/// Where tour documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourLocation {
    /// `<base_url>/<data_path>/<file>` over HTTP
    Remote { base_url: String, data_path: String },
    /// `<dir>/<file>` on the local filesystem
    Directory(String),
}

/// Base URLs templated with a venue slug when hydrating shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBases {
    pub city_guide: String,
    pub rideshare: String,
    pub bag_policy: String,
    pub concessions: String,
    pub parking: String,
}

impl Default for LinkBases {
    fn default() -> Self {
        Self {
            city_guide: "https://concerto.live/city-guide".to_string(),
            rideshare: "https://concerto.live/rideshare".to_string(),
            bag_policy: "https://concerto.live/bag-policy".to_string(),
            concessions: "https://concerto.live/concessions".to_string(),
            parking: "https://concerto.live/parking".to_string(),
        }
    }
}

/// Page function configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ToursConfig {
    /// Source of the tour documents
    pub location: TourLocation,
    /// Document names to load
    pub tour_files: Vec<String>,
    /// Events proxy endpoint; hydration is skipped when unset
    pub events_proxy_url: Option<String>,
    /// Directory prefix for tour artwork
    pub image_dir: String,
    /// Tour keys rendered with the match-up row layout
    pub matchup_tours: Vec<String>,
    /// Link bases used by hydration
    pub link_bases: LinkBases,
    /// Timeout for outbound requests
    pub http_timeout: Duration,
}

impl ToursConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let location = match (non_empty(&var, "TOURS_BASE_URL"), non_empty(&var, "TOURS_DATA_DIR")) {
            (Some(base_url), _) => TourLocation::Remote {
                base_url,
                data_path: non_empty(&var, "TOURS_DATA_PATH").unwrap_or_else(|| "data".to_string()),
            },
            (None, Some(dir)) => TourLocation::Directory(dir),
            (None, None) => {
                return Err(Error::Config(
                    "TOURS_BASE_URL or TOURS_DATA_DIR must be set".to_string(),
                ))
            }
        };

        let tour_files = non_empty(&var, "TOUR_FILES")
            .map(|files| split_list(&files))
            .unwrap_or_else(|| DEFAULT_TOUR_FILES.iter().map(|f| f.to_string()).collect());

        let matchup_tours = non_empty(&var, "MATCHUP_TOURS")
            .map(|keys| split_list(&keys))
            .unwrap_or_else(|| vec!["fifa-world-cup-2026".to_string()]);

        let defaults = LinkBases::default();
        let link_bases = LinkBases {
            city_guide: non_empty(&var, "LINK_BASE_CITY_GUIDE").unwrap_or(defaults.city_guide),
            rideshare: non_empty(&var, "LINK_BASE_RIDESHARE").unwrap_or(defaults.rideshare),
            bag_policy: non_empty(&var, "LINK_BASE_BAG_POLICY").unwrap_or(defaults.bag_policy),
            concessions: non_empty(&var, "LINK_BASE_CONCESSIONS").unwrap_or(defaults.concessions),
            parking: non_empty(&var, "LINK_BASE_PARKING").unwrap_or(defaults.parking),
        };

        Ok(Self {
            location,
            tour_files,
            events_proxy_url: non_empty(&var, "EVENTS_PROXY_URL"),
            image_dir: non_empty(&var, "TOUR_IMAGE_DIR").unwrap_or_else(|| "./images/tours".to_string()),
            matchup_tours,
            link_bases,
            http_timeout: http_timeout(&var)?,
        })
    }
}

/// Events proxy configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// API key supplied directly
    pub api_key: Option<String>,
    /// Secrets Manager ARN holding the API key
    pub api_key_secret_arn: Option<String>,
    /// Upstream events endpoint
    pub upstream_url: String,
    /// Events requested per page
    pub page_size: u32,
    /// Hard cap on upstream requests per invocation
    pub max_pages: u32,
    /// Timeout for outbound requests
    pub http_timeout: Duration,
}

impl ProxyConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_key: non_empty(&var, "TICKETMASTER_API_KEY"),
            api_key_secret_arn: non_empty(&var, "TICKETMASTER_SECRET_ARN"),
            upstream_url: non_empty(&var, "TICKETMASTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_TICKETMASTER_URL.to_string()),
            page_size: parse_number(&var, "TM_PAGE_SIZE", 200)?,
            max_pages: parse_number(&var, "TM_MAX_PAGES", 50)?,
            http_timeout: http_timeout(&var)?,
        })
    }
}

fn non_empty(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_number<T: std::str::FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T> {
    match non_empty(var, key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", key, raw))),
        None => Ok(default),
    }
}

fn http_timeout(var: &impl Fn(&str) -> Option<String>) -> Result<Duration> {
    parse_number(var, "HTTP_TIMEOUT_SECS", 10u64).map(Duration::from_secs)
}
