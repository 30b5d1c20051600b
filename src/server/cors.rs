//! CORS headers for browser callers

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::server::api::AppState;

/// Sent when the preflight does not name the headers it wants
pub const DEFAULT_ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const MAX_AGE_SECS: &str = "3600";

/// Pick the `Access-Control-Allow-Origin` value.
///
/// A listed origin is echoed back. Otherwise a `*` entry opens the endpoint
/// to everyone, and failing that the first listed origin is returned so the
/// browser rejects the response. `None` only for an empty list.
pub fn allow_origin(request_origin: Option<&str>, allowed: &[String]) -> Option<String> {
    if let Some(origin) = request_origin {
        if allowed.iter().any(|entry| entry == origin) {
            return Some(origin.to_string());
        }
    }

    if allowed.iter().any(|entry| entry == "*") {
        return Some("*".to_string());
    }

    allowed.first().cloned()
}

/// Build the full CORS header set for a request
pub fn cors_headers(request_headers: &HeaderMap, allowed: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let origin = request_headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    if let Some(allowed_origin) = allow_origin(origin, allowed) {
        match HeaderValue::from_str(&allowed_origin) {
            Ok(value) => {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
            Err(_) => warn!("Allow-list entry is not a valid header value: {}", allowed_origin),
        }
    }

    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );

    let allow_headers = request_headers
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .filter(|value| !value.as_bytes().is_empty())
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);

    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE_SECS),
    );

    headers
}

/// Loads the per-invocation config, answers preflights, and stamps CORS
/// headers on every other response.
///
/// The loaded [`ProxyConfig`](crate::core::config::ProxyConfig) is handed to
/// the handler through request extensions so it is read once per request.
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let config = state.config.load();
    let headers = cors_headers(request.headers(), &config.allowed_origins);

    if request.method() == Method::OPTIONS {
        debug!("Answering preflight for {}", request.uri().path());
        return (StatusCode::NO_CONTENT, headers).into_response();
    }

    request.extensions_mut().insert(config);

    let mut response = next.run(request).await;
    response.headers_mut().extend(headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allow_origin_echoes_listed_origin() {
        let allowed = list(&["https://a.example", "https://b.example"]);
        assert_eq!(
            allow_origin(Some("https://b.example"), &allowed).as_deref(),
            Some("https://b.example")
        );
    }

    #[test]
    fn test_allow_origin_wildcard() {
        let allowed = list(&["https://a.example", "*"]);
        assert_eq!(
            allow_origin(Some("https://evil.example"), &allowed).as_deref(),
            Some("*")
        );
        assert_eq!(allow_origin(None, &allowed).as_deref(), Some("*"));
    }

    #[test]
    fn test_allow_origin_falls_back_to_first_entry() {
        let allowed = list(&["https://a.example", "https://b.example"]);
        assert_eq!(
            allow_origin(Some("https://evil.example"), &allowed).as_deref(),
            Some("https://a.example")
        );
        assert_eq!(
            allow_origin(None, &allowed).as_deref(),
            Some("https://a.example")
        );
    }

    #[test]
    fn test_allow_origin_empty_list() {
        assert_eq!(allow_origin(Some("https://a.example"), &[]), None);
    }

    #[test]
    fn test_cors_headers_defaults() {
        let mut request = HeaderMap::new();
        request.insert(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"));

        let headers = cors_headers(&request, &list(&["http://localhost:5173"]));

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(headers[header::VARY], "Origin");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], DEFAULT_ALLOWED_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
    }

    #[test]
    fn test_cors_headers_echo_requested_headers() {
        let mut request = HeaderMap::new();
        request.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type, x-firebase-appcheck"),
        );

        let headers = cors_headers(&request, &list(&["*"]));

        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "content-type, x-firebase-appcheck"
        );
    }
}
