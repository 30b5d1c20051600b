//! CLI command definitions and handlers

use clap::Subcommand;
use serde_json::json;
use tracing::info;

use crate::core::client::{translate_payload, DeepLClient};
use crate::core::config::{ConfigSource, EnvConfigSource};

/// Commands for the DeepL proxy
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,
    },

    /// Translate sentences once and print the JSON result
    Translate {
        /// Sentences to translate, in order
        #[arg(required = true)]
        sentences: Vec<String>,

        /// Target language (default: TR)
        #[arg(short, long)]
        target_lang: Option<String>,

        /// Source language (auto-detect if not specified)
        #[arg(long)]
        source_lang: Option<String>,
    },
}

/// Handle server command
pub async fn handle_server(host: String, port: u16) -> anyhow::Result<()> {
    crate::server::api::run_server(host, port).await
}

/// Handle one-shot translation command
pub async fn handle_translate(
    sentences: Vec<String>,
    target_lang: Option<String>,
    source_lang: Option<String>,
) -> anyhow::Result<()> {
    info!("Translating {} sentence(s)", sentences.len());

    let payload = json!({
        "sentences": sentences,
        "targetLang": target_lang,
        "sourceLang": source_lang,
    });

    let client = DeepLClient::new()?;
    let config = EnvConfigSource.load();

    let result = translate_payload(&client, &config, &payload).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
