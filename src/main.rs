//! spalce-common - document store connectivity check

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use spalce_common::{Config, Context};

#[derive(Parser)]
#[command(name = "spalce-common")]
#[command(about = "Check connectivity to the configured document store")]
struct Cli {
    /// Run in verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Additional config file, layered above the project config
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::info!(
        "Loaded configuration for service: {}",
        config.service.name
    );

    tracing::info!("Connecting to {}", config.mongo.connection_string());
    let ctx = Context::connect(config).await?;

    ctx.database.ping().await?;
    tracing::info!("Database {} is reachable", ctx.database.name());

    Ok(())
}
