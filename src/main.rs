//! Main entry point for the DeepL proxy CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deepl_proxy::cli::commands::{self, Commands};

/// DeepL Proxy - keeps the DeepL key on the server
#[derive(Parser, Debug)]
#[command(name = "deepl-proxy", version, about, long_about = None)]
struct Args {
    /// DeepL API key (optional, defaults to DEEPL_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("deepl_proxy={},tower_http={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("DEEPL_API_KEY", api_key);
    }

    match args.command {
        Some(Commands::Server { host, port }) => {
            commands::handle_server(host, port).await?;
        }
        Some(Commands::Translate {
            sentences,
            target_lang,
            source_lang,
        }) => {
            commands::handle_translate(sentences, target_lang, source_lang).await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
