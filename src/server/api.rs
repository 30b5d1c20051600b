//! HTTP API server implementation

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::{Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::client::{translate_payload, DeepLClient};
use crate::core::config::{ConfigSource, EnvConfigSource, ProxyConfig};
use crate::core::errors::ProxyError;
use crate::server::callable::translate_with_deepl_handler;
use crate::server::cors::cors_middleware;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) client: DeepLClient,
    pub(crate) config: Arc<dyn ConfigSource>,
}

impl AppState {
    /// Create state from a client and a configuration source
    pub fn new(client: DeepLClient, config: Arc<dyn ConfigSource>) -> Self {
        Self { client, config }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure
    pub error: String,
}

/// Health check handler
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// HTTP status for each proxy failure
pub fn status_for(err: &ProxyError) -> StatusCode {
    match err {
        ProxyError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        ProxyError::FailedPrecondition { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        ProxyError::Unavailable { .. } | ProxyError::Internal { .. } => StatusCode::BAD_GATEWAY,
        ProxyError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
    }
}

/// Accepts a JSON body, or a JSON string that itself holds the JSON body
fn parse_body(body: &[u8]) -> serde_json::Result<Value> {
    match serde_json::from_slice::<Value>(body)? {
        Value::String(inner) => serde_json::from_str(&inner),
        value => Ok(value),
    }
}

/// Raw HTTP translation handler
async fn translate(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<ProxyConfig>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed. Use POST.");
    }

    let payload = match parse_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Rejected malformed JSON body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON body.");
        }
    };

    match translate_payload(&state.client, &config, &payload).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            warn!("Translation failed ({}): {}", status, e);
            error_response(status, e.to_string())
        }
    }
}

/// Build the router with both bindings behind the CORS layer
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(health_check))
        .route("/translate", any(translate))
        .route("/translateWithDeepL", post(translate_with_deepl_handler))
        .layer(middleware::from_fn_with_state(state.clone(), cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(host: String, port: u16) -> anyhow::Result<()> {
    let client = DeepLClient::new()?;
    let state = AppState::new(client, Arc::new(EnvConfigSource));

    let app = router(state);

    // Bind address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
