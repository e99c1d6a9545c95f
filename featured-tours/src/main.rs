//! Featured Tours Lambda - Handles GET /tours.
//!
//! Every request is one page load: tour documents are fetched, externally
//! sourced tours are hydrated through the events proxy, the `tour` query
//! parameter picks the view, and the page is rendered.
//!
//! Query parameters:
//! - tour - selected tour slug
//! - q - search query
//! - show - index of the expanded show row
//! - format=json - return the view tree instead of HTML

use concerto_shared::http::{html_response, json_response, query_param};
use concerto_shared::router::TOUR_PARAM;
use concerto_shared::{
    html_document, load_tours, render, source_from_config, AppState, Hydrator, MemoryHistory,
    ProxyEventsClient, RenderOptions, Router, ToursConfig, View,
};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Function state shared across invocations
struct FunctionState {
    config: ToursConfig,
    http_client: reqwest::Client,
    options: RenderOptions,
}

impl FunctionState {
    fn new() -> Result<Self, Error> {
        let config = ToursConfig::from_env()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        let options = RenderOptions::from(&config);

        Ok(Self {
            config,
            http_client,
            options,
        })
    }

    fn hydrator(&self) -> Option<Hydrator> {
        self.config.events_proxy_url.as_ref().map(|url| {
            Hydrator::new(
                Box::new(ProxyEventsClient::new(self.http_client.clone(), url.clone())),
                self.config.link_bases.clone(),
            )
        })
    }
}

async fn handler(state: Arc<FunctionState>, event: Request) -> Result<Response<Body>, Error> {
    let source = source_from_config(&state.config, state.http_client.clone());
    let hydrator = state.hydrator();
    let tours = load_tours(source.as_ref(), &state.config.tour_files, hydrator.as_ref()).await;

    let mut app = AppState::new(tours);
    let router = Router::new(MemoryHistory::new(query_param(&event, TOUR_PARAM)));
    router.init(&mut app);

    if let Some(q) = query_param(&event, "q") {
        app.update_search(&q);
    }
    if let Some(index) = query_param(&event, "show").and_then(|s| s.parse().ok()) {
        app.toggle_show(index);
    }

    match app.view {
        View::Detail { tour } => info!("Rendering tour {}", app.tours[tour].slug()),
        View::Library => info!("Rendering library with {} tours", app.tours.len()),
    }

    let page = render(&app, &state.options);
    if query_param(&event, "format").as_deref() == Some("json") {
        json_response(200, &page)
    } else {
        html_response(200, html_document(&page))
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(FunctionState::new()?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
