// src/main.rs

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use attache::api::http::http_router;
use attache::config::CONFIG;
use attache::extract::PdfExtractor;
use attache::llm::OpenAiClient;
use attache::state::AppState;

#[derive(Parser)]
#[command(name = "attache")]
#[command(about = "Chat relay server: personas, quick actions, and file attachments")]
struct Args {
    /// Bind host (overrides ATTACHE_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides ATTACHE_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting attache server");
    info!("Model: {} (vision: {})", CONFIG.model, CONFIG.vision_model);
    info!("Provider: {}", CONFIG.api_base);

    let provider = Arc::new(OpenAiClient::from_config()?);
    let extractor = PdfExtractor::new(CONFIG.pdftotext_bin.clone());
    let app_state = Arc::new(AppState::new(provider, extractor));

    let app = http_router(app_state);

    let bind_address = format!(
        "{}:{}",
        args.host.as_deref().unwrap_or(&CONFIG.host),
        args.port.unwrap_or(CONFIG.port)
    );
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Listening on http://{}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
