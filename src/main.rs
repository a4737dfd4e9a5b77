mod components;
mod config;
mod error;
mod startup;
mod utils;

use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting Raid Helper calendar");

    // Load configuration
    let config = startup::load_config().await?;

    // Fetch and print the aggregated schedule
    startup::run(config).await
}
