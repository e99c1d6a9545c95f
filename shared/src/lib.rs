//! Shared library for the Concerto featured tours Lambda functions.
//!
//! This crate provides the tour model, the loader and event hydrator, the
//! events proxy core, the view router and the renderer used by both functions.

pub mod config;
pub mod dates;
pub mod error;
pub mod http;
pub mod hydrator;
pub mod loader;
pub mod models;
pub mod proxy;
pub mod render;
pub mod router;
pub mod search;
pub mod secrets;
pub mod slug;
pub mod state;
pub mod surface;

pub use config::{LinkBases, ProxyConfig, TourLocation, ToursConfig};
pub use error::{Error, Result};
pub use hydrator::{EventsClient, Hydrator, ProxyEventsClient};
pub use loader::{load_tours, source_from_config, DirTourSource, HttpTourSource, TourSource};
pub use models::{DisplayMode, ExternalSource, Show, ShowLinks, SourceKind, Tour};
pub use proxy::{EventQuery, EventsUpstream, TicketmasterClient};
pub use render::{render, PageView, RenderOptions};
pub use router::{MemoryHistory, Navigator, Router};
pub use state::{AppState, View};
pub use surface::{html_document, HtmlSurface, Surface};
