//! DeepL Proxy - server-side translation proxy
//!
//! Forwards sentence batches from browser clients to DeepL without exposing
//! the API key, behind a raw HTTP endpoint with CORS handling and a callable
//! endpoint that speaks the `{"data": ...}` / `{"result": ...}` envelope.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    client::{translate_payload, DeepLClient},
    config::{ConfigSource, EnvConfigSource, ProxyConfig, UpstreamEndpoints},
    credentials::ResolvedCredential,
    errors::{ErrorKind, ProxyError},
    models::{TranslationRequest, TranslationResult, UpstreamTier},
};

pub use crate::server::{
    api::{router, AppState},
    callable::{translate_with_deepl, CallableCode, CallableError},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
