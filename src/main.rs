use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trackdash::config::AppConfig;
use trackdash::web;

#[derive(Parser)]
#[command(name = "trackdash")]
#[command(version, about = "Issue-tracker reporting dashboard")]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "trackdash.toml")]
    config: PathBuf,

    /// Override the listen address from the config file.
    #[arg(long)]
    bind: Option<String>,

    /// Override the listen port from the config file.
    #[arg(long)]
    port: Option<u16>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Tracker credentials may live in a local .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    web::start_server(config).await
}
