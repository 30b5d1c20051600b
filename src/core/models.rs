//! Core data models for translation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::core::errors::{ProxyError, Result};

/// Target language used when the caller does not pick one
pub const DEFAULT_TARGET_LANG: &str = "TR";

/// Which DeepL host a credential routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpstreamTier {
    /// api-free.deepl.com, selected by a `:fx` key suffix
    Free,
    /// api.deepl.com
    Standard,
}

impl fmt::Display for UpstreamTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamTier::Free => write!(f, "free"),
            UpstreamTier::Standard => write!(f, "standard"),
        }
    }
}

/// Normalized translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Trimmed, non-empty sentences in caller order
    pub sentences: Vec<String>,
    /// Caller-supplied key, preferred over the server's
    pub api_key: Option<String>,
    /// Upper-cased target language
    pub target_lang: String,
    /// Upper-cased source language; `None` lets DeepL detect it
    pub source_lang: Option<String>,
}

impl TranslationRequest {
    /// Request with the default target language and auto-detected source
    pub fn new(sentences: Vec<String>) -> Self {
        Self {
            sentences,
            api_key: None,
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            source_lang: None,
        }
    }

    /// Set the target language
    pub fn with_target_lang(mut self, target_lang: impl Into<String>) -> Self {
        self.target_lang = target_lang.into();
        self
    }

    /// Set the source language
    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = Some(source_lang.into());
        self
    }

    /// Set the caller key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Validate and normalize a raw `{ sentences, apiKey?, targetLang?, sourceLang? }`
    /// payload.
    ///
    /// Sentences are trimmed; non-strings and blanks are dropped while the
    /// relative order of the rest is kept. Language codes are trimmed and
    /// upper-cased.
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let raw_sentences = match payload.get("sentences") {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => {
                return Err(ProxyError::invalid_argument(
                    "sentences must be a non-empty array of strings.",
                ))
            }
        };

        let sentences: Vec<String> = raw_sentences
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect();

        if sentences.is_empty() {
            return Err(ProxyError::invalid_argument(
                "Provide at least one non-empty sentence to translate.",
            ));
        }

        let api_key = payload
            .get("apiKey")
            .and_then(Value::as_str)
            .map(str::to_string);

        let target_lang = language_code(payload.get("targetLang"))
            .unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string());
        let source_lang = language_code(payload.get("sourceLang"));

        Ok(Self {
            sentences,
            api_key,
            target_lang,
            source_lang,
        })
    }
}

fn language_code(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
}

/// Translation result, one entry per input sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Trimmed translations, in DeepL's order
    pub translations: Vec<String>,
}
