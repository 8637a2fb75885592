//! Smartsheet MCP Gateway Library
//!
//! Remote Model Context Protocol (MCP) server exposing the Smartsheet API
//! as tools over JSON-RPC 2.0 on HTTP.
//!
//! # Features
//!
//! - **Stateless HTTP**: one JSON-RPC request per `POST /mcp`
//! - **Per-request credentials**: Smartsheet API key and endpoint travel in headers
//! - **Client cache**: bounded, keyed by a hash of the credentials
//! - **Shared-secret gate**: optional `x-secret-key` check on `tools/call`
//!
//! # Protocol Version
//!
//! Implements MCP protocol version 2024-11-05.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod smartsheet;
pub mod tools;

pub use error::{Error, Result};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| Error::Internal(format!("Failed to setup tracing: {e}")))?,
        _ => subscriber
            .with(fmt::layer())
            .try_init()
            .map_err(|e| Error::Internal(format!("Failed to setup tracing: {e}")))?,
    }

    Ok(())
}
