//! Events Proxy Lambda - Handles GET /tm-events.
//!
//! Pages through the Ticketmaster Discovery API for an attraction or keyword
//! and returns every event in one `{ "events": [...] }` body, so the browser
//! never sees the API key.

use concerto_shared::http::error_response;
use concerto_shared::proxy::respond;
use concerto_shared::secrets::resolve_api_key;
use concerto_shared::{EventQuery, ProxyConfig, TicketmasterClient};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    config: ProxyConfig,
    http_client: reqwest::Client,
}

impl AppState {
    fn new() -> Result<Self, Error> {
        let config = ProxyConfig::from_env()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self { config, http_client })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let query = EventQuery::from_request(&event);
    info!(
        "Received events request: attraction_id={:?}, keyword={:?}",
        query.attraction_id, query.keyword
    );

    let api_key = match resolve_api_key(&state.config).await {
        Ok(key) => key,
        Err(e) => {
            error!("Failed to resolve API key: {}", e);
            return error_response(500, e.to_string());
        }
    };

    let config = &state.config;
    respond(
        query,
        api_key,
        |key| {
            TicketmasterClient::new(
                state.http_client.clone(),
                config.upstream_url.clone(),
                key,
                config.page_size,
            )
        },
        config.max_pages,
    )
    .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new()?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
