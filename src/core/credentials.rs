//! API key resolution and tier routing

use crate::core::errors::{ProxyError, Result};
use crate::core::models::UpstreamTier;

const FREE_KEY_SUFFIX: &str = ":fx";

/// The key actually sent to DeepL and the host it routes to
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    key: String,
    tier: UpstreamTier,
}

impl ResolvedCredential {
    /// Pick the caller's key if one was sent, else the configured one.
    ///
    /// Only an absent or empty caller key falls through. A key that is
    /// present but blank after trimming is rejected rather than replaced.
    pub fn resolve(caller_key: Option<&str>, configured_key: Option<&str>) -> Result<Self> {
        let key = [caller_key, configured_key]
            .into_iter()
            .flatten()
            .find(|key| !key.is_empty())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ProxyError::failed_precondition(
                    "DeepL API key is not configured on the server \
                     and none was provided by the client.",
                )
            })?;

        Ok(Self {
            tier: tier_for_key(key),
            key: key.to_string(),
        })
    }

    /// The trimmed key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Host tier derived from the key suffix
    pub fn tier(&self) -> UpstreamTier {
        self.tier
    }

    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("DeepL-Auth-Key {}", self.key)
    }
}

// Keep keys out of logs.
impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("key", &"<redacted>")
            .field("tier", &self.tier)
            .finish()
    }
}

/// Free-tier keys carry a `:fx` suffix, in any case.
pub fn tier_for_key(key: &str) -> UpstreamTier {
    if key.to_lowercase().ends_with(FREE_KEY_SUFFIX) {
        UpstreamTier::Free
    } else {
        UpstreamTier::Standard
    }
}
