// src/bin/console.rs
//! Terminal chat console for the attache relay server.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use attache::console::Console;

#[derive(Parser)]
#[command(name = "attache-console")]
#[command(about = "Terminal chat console for the attache relay server")]
struct Args {
    /// Server base URL
    #[arg(long, env = "ATTACHE_SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep logs quiet by default; the console output is the UI.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    Console::new(args.server)?.run().await
}
