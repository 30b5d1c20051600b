//! Configuration management

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Origins allowed to receive their own origin back in CORS responses
/// when `ALLOWED_ORIGINS` is not set
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://sentence-translator.web.app",
    "https://sentence-translator.firebaseapp.com",
    "capacitor://localhost",
    "http://localhost:3000",
    "http://localhost:5000",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8080",
];

/// DeepL free-tier translate endpoint
pub const DEEPL_FREE_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";

/// DeepL paid-tier translate endpoint
pub const DEEPL_STANDARD_ENDPOINT: &str = "https://api.deepl.com/v2/translate";

/// Process-wide settings, read once per invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Server-side DeepL key, used when the caller supplies none
    pub api_key: Option<String>,
    /// CORS allow-list; `*` means any origin
    pub allowed_origins: Vec<String>,
}

impl ProxyConfig {
    /// Build a config with the default allow-list
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            allowed_origins: default_allowed_origins(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let api_key = std::env::var("DEEPL_API_KEY")
            .or_else(|_| std::env::var("DEEPL_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|raw| parse_origin_list(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(default_allowed_origins);

        debug!(
            "Loaded config: server key {}, {} allowed origins",
            if api_key.is_some() { "present" } else { "absent" },
            allowed_origins.len()
        );

        Self {
            api_key,
            allowed_origins,
        }
    }

    /// Override the allow-list
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }
}

/// Supplies a fresh [`ProxyConfig`] for every invocation
pub trait ConfigSource: Send + Sync {
    /// Read the current configuration
    fn load(&self) -> ProxyConfig;
}

impl ConfigSource for ProxyConfig {
    fn load(&self) -> ProxyConfig {
        self.clone()
    }
}

/// Reads the process environment on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfigSource;

impl ConfigSource for EnvConfigSource {
    fn load(&self) -> ProxyConfig {
        ProxyConfig::from_env()
    }
}

/// The two DeepL hosts a resolved credential can route to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamEndpoints {
    /// URL used for `:fx` keys
    pub free: String,
    /// URL used for every other key
    pub standard: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            free: DEEPL_FREE_ENDPOINT.to_string(),
            standard: DEEPL_STANDARD_ENDPOINT.to_string(),
        }
    }
}

impl UpstreamEndpoints {
    /// Point both tiers somewhere else (tests, self-hosted mocks)
    pub fn new(free: impl Into<String>, standard: impl Into<String>) -> Self {
        Self {
            free: free.into(),
            standard: standard.into(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
