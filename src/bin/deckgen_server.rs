//! Deck export server binary

use anyhow::{Result, bail};
use deckgen::server::{Server, load_config, validate_config};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = load_config()?;

    if let Err(errors) = validate_config(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        bail!("{} configuration error(s)", errors.len());
    }

    info!("Starting deckgen server v{}", env!("CARGO_PKG_VERSION"));

    Server::new(config).run().await?;

    info!("Server shutdown complete");
    Ok(())
}
