//! DeepL forwarding client and the shared translation pipeline

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::{ProxyConfig, UpstreamEndpoints};
use crate::core::credentials::ResolvedCredential;
use crate::core::errors::{ProxyError, Result};
use crate::core::models::{TranslationRequest, TranslationResult, UpstreamTier};

/// Forwards one normalized request to DeepL per call.
///
/// Holds nothing but a connection pool and the two endpoint URLs; every
/// call is a single attempt with no retries and no client-side timeout.
#[derive(Debug, Clone)]
pub struct DeepLClient {
    client: reqwest::Client,
    endpoints: UpstreamEndpoints,
}

impl DeepLClient {
    /// Create a client against DeepL's public hosts
    pub fn new() -> Result<Self> {
        Self::with_endpoints(UpstreamEndpoints::default())
    }

    /// Create a client against custom endpoints
    pub fn with_endpoints(endpoints: UpstreamEndpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProxyError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, endpoints })
    }

    /// URL for a tier
    pub fn endpoint(&self, tier: UpstreamTier) -> &str {
        match tier {
            UpstreamTier::Free => &self.endpoints.free,
            UpstreamTier::Standard => &self.endpoints.standard,
        }
    }

    /// Send the request to DeepL and map the reply
    pub async fn forward(
        &self,
        request: &TranslationRequest,
        credential: &ResolvedCredential,
    ) -> Result<TranslationResult> {
        let url = self.endpoint(credential.tier());
        debug!(
            "Forwarding {} sentence(s) to {} tier, target {}",
            request.sentences.len(),
            credential.tier(),
            request.target_lang
        );

        let response = self
            .client
            .post(url)
            .header("Authorization", credential.authorization())
            .form(&form_params(request))
            .send()
            .await
            .map_err(|e| {
                warn!("DeepL unreachable: {}", e);
                ProxyError::Unavailable {
                    message: e.to_string(),
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("DeepL returned {}", status);
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|_| ProxyError::internal("Unable to parse DeepL response JSON."))?;

        parse_translations(&payload)
    }
}

/// Form fields in DeepL's order: one `text` per sentence, then options
fn form_params(request: &TranslationRequest) -> Vec<(&'static str, &str)> {
    let mut params: Vec<(&'static str, &str)> = request
        .sentences
        .iter()
        .map(|text| ("text", text.as_str()))
        .collect();

    params.push(("target_lang", request.target_lang.as_str()));
    params.push(("preserve_formatting", "1"));
    params.push(("formality", "default"));

    if let Some(source_lang) = &request.source_lang {
        params.push(("source_lang", source_lang.as_str()));
    }

    params
}

/// Map a decoded DeepL success body to trimmed translations.
///
/// The entry count is whatever DeepL sent; it is not checked against the
/// number of input sentences.
pub fn parse_translations(payload: &Value) -> Result<TranslationResult> {
    let entries = payload
        .get("translations")
        .and_then(Value::as_array)
        .ok_or_else(|| ProxyError::internal("DeepL response missing translations array."))?;

    let translations = entries
        .iter()
        .map(|entry| {
            entry
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .collect();

    Ok(TranslationResult { translations })
}

/// Run the whole pipeline for one invocation:
/// normalize, resolve the credential, forward, map.
pub async fn translate_payload(
    client: &DeepLClient,
    config: &ProxyConfig,
    payload: &Value,
) -> Result<TranslationResult> {
    let request = TranslationRequest::from_payload(payload)?;
    let credential =
        ResolvedCredential::resolve(request.api_key.as_deref(), config.api_key.as_deref())?;

    let result = client.forward(&request, &credential).await?;

    info!(
        "Translated {} sentence(s) via {} tier",
        result.translations.len(),
        credential.tier()
    );

    Ok(result)
}
