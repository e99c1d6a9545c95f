//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Request, RequestExt, Response};
use serde::Serialize;

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

fn respond(status: u16, content_type: &str, body: String) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", content_type)
        .header("access-control-allow-origin", "*")
        .body(Body::from(body))?)
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    respond(status, "application/json", serde_json::to_string(data)?)
}

/// Create an HTML response.
pub fn html_response(status: u16, html: String) -> Result<Response<Body>, lambda_http::Error> {
    respond(status, "text/html; charset=utf-8", html)
}

/// Create an error response with the given status code and message.
pub fn error_response(status: u16, message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    json_response(status, &ErrorBody::new(message))
}

/// First non-blank value of a query string parameter.
pub fn query_param(event: &Request, name: &str) -> Option<String> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_error_response_shape() {
        let response = error_response(400, "Provide attractionId or keyword").unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body: serde_json::Value = serde_json::from_slice(response.body().as_ref()).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Provide attractionId or keyword");
        assert_eq!(body.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_query_param_skips_blank() {
        let params: HashMap<String, String> = [
            ("attractionId".to_string(), "K8vZ".to_string()),
            ("keyword".to_string(), "   ".to_string()),
        ]
        .into_iter()
        .collect();
        let request = Request::default().with_query_string_parameters(params);
        assert_eq!(query_param(&request, "attractionId").as_deref(), Some("K8vZ"));
        assert_eq!(query_param(&request, "keyword"), None);
        assert_eq!(query_param(&request, "missing"), None);
    }
}
