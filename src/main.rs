//! Smartsheet MCP Gateway - remote MCP server for the Smartsheet API

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use smartsheet_mcp_gateway::{cli::Cli, config::Config, gateway::Gateway, setup_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Re-read env-backed flags now that configured env files are loaded
    let cli = if config.env_files.is_empty() { cli } else { Cli::parse() };
    cli.apply_overrides(&mut config);

    if let Err(e) = setup_tracing(cli.log_level(config.debug), cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        require_auth = config.auth.require_auth,
        debug = config.debug,
        env_files = config.env_files.len(),
        "Starting Smartsheet MCP Gateway"
    );

    let gateway = match Gateway::new(config) {
        Ok(g) => g,
        Err(e) => {
            error!("Failed to create gateway: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = gateway.run().await {
        error!("Gateway error: {e}");
        return ExitCode::FAILURE;
    }

    info!("Gateway shutdown complete");
    ExitCode::SUCCESS
}
