//! # Surf Bot Application Entry Point
//!
//! This binary wires the forecast pipeline to Discord. It supports both
//! production mode (gateway connection) and development mode (`--lookup`, which
//! prints one report to stdout without connecting to Discord).


mod console;
mod discord;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use surf_bot_lib::config::{resolve_token, Config, DEFAULT_CONFIG_PATH};
use surf_bot_lib::handler::ForecastService;
use surf_bot_lib::logging::init_logging;
use surf_bot_lib::msw_client::MswClient;

/// The service as the binary runs it, over the HTTP client
pub(crate) type AppService = ForecastService<MswClient>;

#[derive(Debug, Parser)]
#[command(name = "surf-bot", about = "Discord bot posting surf forecasts and tide times")]
struct Args {
    /// Discord bot token (falls back to DISCORD_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print the report for this spot to stdout and exit
    #[arg(long, value_name = "SPOT")]
    lookup: Option<String>,

    /// Write the default configuration to --config and exit
    #[arg(long)]
    write_config: bool,

    /// Default log level, RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    if args.write_config {
        Config::default().save(&args.config)?;
        return Ok(());
    }

    let config = Arc::new(Config::load_from_path(&args.config));
    let client = MswClient::new(&config.api)?;
    let service = Arc::new(ForecastService::new(client, config));

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    // Development mode: one report to stdout, no Discord connection
    if let Some(spot) = args.lookup {
        rt.block_on(console::run_lookup(&service, &spot));
        return Ok(());
    }

    let token =
        resolve_token(args.token.as_deref()).context("cannot start the Discord session")?;

    rt.block_on(discord::run(token, service))
}
