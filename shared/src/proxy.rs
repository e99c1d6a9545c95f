//! Events proxy: pages through the upstream Discovery API and returns every
//! event in one `{ "events": [...] }` envelope, keeping the API key server side.

use async_trait::async_trait;
use lambda_http::{Body, Request, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::http::{error_response, json_response, query_param};
use crate::hydrator::EventsEnvelope;
use crate::{Error, Result};

/// Which events to ask the upstream for. At least one field must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub attraction_id: Option<String>,
    pub keyword: Option<String>,
}

impl EventQuery {
    pub fn from_request(event: &Request) -> Self {
        Self {
            attraction_id: query_param(event, "attractionId"),
            keyword: query_param(event, "keyword"),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.attraction_id.is_none() && self.keyword.is_none() {
            return Err(Error::Validation("Provide attractionId or keyword".to_string()));
        }
        Ok(())
    }
}

/// One page of upstream results.
#[derive(Debug, Default)]
pub struct UpstreamPage {
    pub events: Vec<Value>,
    pub total_pages: u32,
}

#[derive(Debug, Default, Deserialize)]
struct RawPage {
    #[serde(default, rename = "_embedded")]
    embedded: Option<EventsEnvelope<Value>>,
    #[serde(default)]
    page: Option<PageInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    total_pages: Option<u32>,
}

impl From<RawPage> for UpstreamPage {
    fn from(raw: RawPage) -> Self {
        Self {
            events: raw.embedded.map(|e| e.events).unwrap_or_default(),
            total_pages: raw
                .page
                .and_then(|p| p.total_pages)
                .filter(|n| *n > 0)
                .unwrap_or(1),
        }
    }
}

/// Parse an upstream page body.
pub fn parse_page(body: &[u8]) -> Result<UpstreamPage> {
    let raw: RawPage = serde_json::from_slice(body)?;
    Ok(raw.into())
}

/// A paged source of raw events.
#[async_trait]
pub trait EventsUpstream: Send + Sync {
    async fn fetch_page(&self, query: &EventQuery, page: u32) -> Result<UpstreamPage>;
}

/// Ticketmaster Discovery v2 events endpoint.
pub struct TicketmasterClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl TicketmasterClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, api_key: String, page_size: u32) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            api_key,
            page_size,
        }
    }
}

#[async_trait]
impl EventsUpstream for TicketmasterClient {
    async fn fetch_page(&self, query: &EventQuery, page: u32) -> Result<UpstreamPage> {
        let mut params = vec![
            ("apikey", self.api_key.clone()),
            ("size", self.page_size.to_string()),
            ("page", page.to_string()),
        ];
        // No countryCode so US, CA and MX dates all come back
        if let Some(id) = &query.attraction_id {
            params.push(("attractionId", id.clone()));
        }
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "Ticketmaster returned HTTP {} for page {}",
                status.as_u16(),
                page
            )));
        }

        let body = response.bytes().await?;
        parse_page(&body)
    }
}

/// Request pages sequentially until the upstream's page count or `max_pages` is reached.
pub async fn collect_events(
    upstream: &dyn EventsUpstream,
    query: &EventQuery,
    max_pages: u32,
) -> Result<Vec<Value>> {
    let mut all = Vec::new();
    let mut page = 0;
    let mut total_pages = 1;

    while page < total_pages && page < max_pages {
        let result = upstream.fetch_page(query, page).await?;
        all.extend(result.events);
        total_pages = result.total_pages;
        page += 1;
    }

    if page < total_pages {
        warn!(
            "Stopped after {} of {} upstream pages (safety cap)",
            page, total_pages
        );
    }

    info!("Collected {} events over {} pages", all.len(), page);
    Ok(all)
}

/// Build the proxy response for one request.
///
/// `make_upstream` is only called once the API key and query are known good.
pub async fn respond<U, F>(
    query: EventQuery,
    api_key: Option<String>,
    make_upstream: F,
    max_pages: u32,
) -> std::result::Result<Response<Body>, lambda_http::Error>
where
    U: EventsUpstream,
    F: FnOnce(String) -> U,
{
    let Some(api_key) = api_key else {
        error!("TICKETMASTER_API_KEY is not configured");
        return error_response(500, "Missing TICKETMASTER_API_KEY");
    };

    if let Err(e) = query.validate() {
        return error_response(e.status_code(), e.to_string());
    }

    let upstream = make_upstream(api_key);
    match collect_events(&upstream, &query, max_pages).await {
        Ok(events) => json_response(200, &EventsEnvelope { events }),
        Err(e) => {
            error!("Event fetch failed for {:?}: {}", query, e);
            error_response(500, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Fake upstream with a fixed page count; page `n` holds events `n*10` and `n*10+1`.
    #[derive(Clone)]
    struct PagedUpstream {
        total_pages: u32,
        fail_on: Option<u32>,
        requests: Arc<Mutex<Vec<(EventQuery, u32)>>>,
    }

    impl PagedUpstream {
        fn new(total_pages: u32) -> Self {
            Self {
                total_pages,
                fail_on: None,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl EventsUpstream for PagedUpstream {
        async fn fetch_page(&self, query: &EventQuery, page: u32) -> Result<UpstreamPage> {
            self.requests.lock().unwrap().push((query.clone(), page));
            if self.fail_on == Some(page) {
                return Err(Error::Upstream("connection reset".to_string()));
            }
            Ok(UpstreamPage {
                events: vec![json!({"id": page * 10}), json!({"id": page * 10 + 1})],
                total_pages: self.total_pages,
            })
        }
    }

    fn attraction(id: &str) -> EventQuery {
        EventQuery {
            attraction_id: Some(id.to_string()),
            keyword: None,
        }
    }

    fn body(response: &Response<Body>) -> Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }

    #[tokio::test]
    async fn test_three_pages_three_requests() {
        let upstream = PagedUpstream::new(3);
        let response = respond(attraction("A123"), Some("key".into()), |_| upstream.clone(), 50)
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let ids: Vec<u64> = body(&response)["events"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 10, 11, 20, 21]);

        let pages: Vec<u32> = upstream.requests.lock().unwrap().iter().map(|(_, p)| *p).collect();
        assert_eq!(pages, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_safety_cap() {
        let upstream = PagedUpstream::new(500);
        let events = collect_events(&upstream, &attraction("A1"), 50).await.unwrap();
        assert_eq!(events.len(), 100);
        assert_eq!(upstream.requests.lock().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_missing_query_is_400() {
        let upstream = PagedUpstream::new(1);
        let response = respond(EventQuery::default(), Some("key".into()), |_| upstream.clone(), 50)
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        assert!(upstream.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_is_500() {
        let upstream = PagedUpstream::new(1);
        let response = respond(attraction("A1"), None, |_| upstream.clone(), 50).await.unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(body(&response)["error"], "Missing TICKETMASTER_API_KEY");
    }

    #[tokio::test]
    async fn test_mid_loop_failure_is_500() {
        let mut upstream = PagedUpstream::new(4);
        upstream.fail_on = Some(2);
        let response = respond(attraction("A1"), Some("key".into()), |_| upstream.clone(), 50)
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        assert!(body(&response)["error"].as_str().unwrap().contains("connection reset"));
        assert_eq!(upstream.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_keyword_only_is_forwarded() {
        let upstream = PagedUpstream::new(1);
        let query = EventQuery {
            attraction_id: None,
            keyword: Some("Lady Gaga".into()),
        };
        let response = respond(query.clone(), Some("key".into()), |_| upstream.clone(), 50)
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(upstream.requests.lock().unwrap()[0].0, query);
    }

    #[test]
    fn test_parse_page() {
        let page = parse_page(
            br#"{"_embedded":{"events":[{"id":"a"},{"id":"b"}]},"page":{"size":200,"totalElements":2,"totalPages":1,"number":0}}"#,
        )
        .unwrap();
        assert_eq!(page.events.len(), 2);
        assert_eq!(page.total_pages, 1);

        let empty = parse_page(br#"{"page":{"totalPages":0}}"#).unwrap();
        assert!(empty.events.is_empty());
        assert_eq!(empty.total_pages, 1);

        assert!(parse_page(b"<html>").is_err());
    }
}
