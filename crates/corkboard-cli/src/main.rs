//! Corkboard - a command-line client for a community bulletin board.
//!
//! Lists, reads and writes posts on the board service, keeping the signed-in
//! session between runs.

mod app;
mod commands;
mod render;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = commands::parse(&args)?;
    info!(?command, "Corkboard starting");

    let mut app = App::new()?;
    if let Err(e) = app.run(command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
