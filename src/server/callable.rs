//! Callable binding: `{"data": ...}` in, `{"result": ...}` or `{"error": ...}` out

use axum::{
    body::Bytes,
    extract::{Extension, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::core::client::{translate_payload, DeepLClient};
use crate::core::config::ProxyConfig;
use crate::core::errors::ProxyError;
use crate::core::models::TranslationResult;
use crate::server::api::AppState;

/// Error codes a callable caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableCode {
    /// The request payload was rejected
    InvalidArgument,
    /// No API key on either side
    FailedPrecondition,
    /// DeepL failed or answered with something unusable
    Internal,
}

impl CallableCode {
    /// Client-facing code, e.g. `invalid-argument`
    pub fn as_str(&self) -> &'static str {
        match self {
            CallableCode::InvalidArgument => "invalid-argument",
            CallableCode::FailedPrecondition => "failed-precondition",
            CallableCode::Internal => "internal",
        }
    }

    /// Status name carried on the wire, e.g. `INVALID_ARGUMENT`
    pub fn wire_status(&self) -> &'static str {
        match self {
            CallableCode::InvalidArgument => "INVALID_ARGUMENT",
            CallableCode::FailedPrecondition => "FAILED_PRECONDITION",
            CallableCode::Internal => "INTERNAL",
        }
    }

    /// HTTP status the envelope is sent with
    pub fn http_status(&self) -> StatusCode {
        match self {
            CallableCode::InvalidArgument | CallableCode::FailedPrecondition => {
                StatusCode::BAD_REQUEST
            }
            CallableCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for CallableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error thrown back to a callable caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct CallableError {
    /// Error code
    pub code: CallableCode,
    /// Human-readable message
    pub message: String,
}

impl CallableError {
    /// Build an error from a code and message
    pub fn new(code: CallableCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ProxyError> for CallableError {
    fn from(err: ProxyError) -> Self {
        let code = match &err {
            ProxyError::InvalidArgument { .. } => CallableCode::InvalidArgument,
            ProxyError::FailedPrecondition { .. } => CallableCode::FailedPrecondition,
            ProxyError::Unavailable { .. }
            | ProxyError::Upstream { .. }
            | ProxyError::Internal { .. } => CallableCode::Internal,
        };
        Self::new(code, err.to_string())
    }
}

#[derive(Serialize)]
struct CallableSuccess {
    result: TranslationResult,
}

#[derive(Serialize)]
struct CallableFailure {
    error: CallableErrorBody,
}

#[derive(Serialize)]
struct CallableErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        let body = CallableFailure {
            error: CallableErrorBody {
                status: self.code.wire_status(),
                message: self.message,
            },
        };
        (self.code.http_status(), Json(body)).into_response()
    }
}

/// Translate `{ sentences, apiKey?, targetLang?, sourceLang? }`
pub async fn translate_with_deepl(
    client: &DeepLClient,
    config: &ProxyConfig,
    data: &Value,
) -> Result<TranslationResult, CallableError> {
    translate_payload(client, config, data)
        .await
        .map_err(CallableError::from)
}

/// HTTP envelope for [`translate_with_deepl`]
pub async fn translate_with_deepl_handler(
    State(state): State<Arc<AppState>>,
    Extension(config): Extension<ProxyConfig>,
    body: Bytes,
) -> Response {
    let data = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(mut envelope)) => envelope.remove("data"),
        _ => None,
    };

    let Some(data) = data else {
        return CallableError::new(CallableCode::InvalidArgument, "Bad Request").into_response();
    };

    match translate_with_deepl(&state.client, &config, &data).await {
        Ok(result) => Json(CallableSuccess { result }).into_response(),
        Err(e) => {
            warn!("Callable translation failed: {}", e);
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(CallableCode::InvalidArgument.as_str(), "invalid-argument");
        assert_eq!(CallableCode::FailedPrecondition.wire_status(), "FAILED_PRECONDITION");
        assert_eq!(CallableCode::Internal.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(CallableCode::FailedPrecondition.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_from_proxy_error() {
        let err = CallableError::from(ProxyError::Upstream {
            status: 456,
            body: "quota exceeded".to_string(),
        });
        assert_eq!(err.code, CallableCode::Internal);
        assert_eq!(err.message, "DeepL request failed (456). quota exceeded");

        let err = CallableError::from(ProxyError::Unavailable {
            message: "connection refused".to_string(),
        });
        assert_eq!(err.code, CallableCode::Internal);

        let err = CallableError::from(ProxyError::FailedPrecondition {
            message: "no key".to_string(),
        });
        assert_eq!(err.code, CallableCode::FailedPrecondition);
        assert_eq!(err.to_string(), "failed-precondition: no key");
    }
}
