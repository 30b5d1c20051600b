//! Custom error types for proxy operations

use thiserror::Error;

/// Coarse error classification shared by both transport bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing caller input
    InvalidArgument,
    /// No usable API key on either side
    FailedPrecondition,
    /// DeepL could not be reached
    Unavailable,
    /// DeepL answered with a non-success status
    Upstream,
    /// DeepL answered with a body we cannot interpret
    Internal,
}

/// Proxy-related errors
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Caller input failed validation
    #[error("{message}")]
    InvalidArgument {
        /// What was wrong with the input
        message: String,
    },

    /// Credential missing on both server and caller side
    #[error("{message}")]
    FailedPrecondition {
        /// Which credential was missing
        message: String,
    },

    /// Transport failure reaching DeepL
    #[error("Failed to reach DeepL: {message}")]
    Unavailable {
        /// Transport error text
        message: String,
    },

    /// DeepL returned a non-success status
    #[error("{}", upstream_message(.status, .body))]
    Upstream {
        /// Status code DeepL answered with
        status: u16,
        /// Response body, empty when it could not be read
        body: String,
    },

    /// DeepL returned a success status with an unusable body
    #[error("{message}")]
    Internal {
        /// What was wrong with the body
        message: String,
    },
}

fn upstream_message(status: &u16, body: &str) -> String {
    format!("DeepL request failed ({}). {}", status, body)
        .trim()
        .to_string()
}

impl ProxyError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ProxyError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn failed_precondition(message: impl Into<String>) -> Self {
        ProxyError::FailedPrecondition {
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ProxyError::Internal {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            ProxyError::FailedPrecondition { .. } => ErrorKind::FailedPrecondition,
            ProxyError::Unavailable { .. } => ErrorKind::Unavailable,
            ProxyError::Upstream { .. } => ErrorKind::Upstream,
            ProxyError::Internal { .. } => ErrorKind::Internal,
        }
    }
}

/// Result type for proxy operations
pub type Result<T> = std::result::Result<T, ProxyError>;
