//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, builder::FalseyValueParser};

use crate::config::Config;

/// Remote MCP gateway for the Smartsheet API
#[derive(Parser, Debug)]
#[command(name = "smartsheet-mcp-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "SMARTSHEET_GATEWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Require `x-secret-key` on tools/call (anything but a falsey value enables it)
    #[arg(long, env = "REQUIRE_AUTH", value_parser = FalseyValueParser::new())]
    pub require_auth: Option<bool>,

    /// Shared secret expected in `x-secret-key`
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Verbose logging
    #[arg(long, env = "DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: Option<bool>,

    /// Log level (trace, debug, info, warn, error); defaults to debug when debug is on
    #[arg(long, env = "SMARTSHEET_GATEWAY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, env = "SMARTSHEET_GATEWAY_LOG_FORMAT")]
    pub log_format: Option<String>,
}

impl Cli {
    /// Apply command-line and environment overrides on top of a loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host.clone_from(host);
        }
        if let Some(require_auth) = self.require_auth {
            config.auth.require_auth = require_auth;
        }
        if let Some(ref secret) = self.secret_key {
            config.auth.secret_key = Some(secret.clone());
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
    }

    /// Effective log level given the merged `debug` setting
    #[must_use]
    pub fn log_level(&self, debug: bool) -> &str {
        match self.log_level.as_deref() {
            Some(level) => level,
            None if debug => "debug",
            None => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn overrides_replace_config_values() {
        let cli = Cli::parse_from([
            "smartsheet-mcp-gateway",
            "--port",
            "8080",
            "--host",
            "127.0.0.1",
            "--require-auth",
            "false",
            "--secret-key",
            "abc",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.auth.require_auth);
        assert_eq!(config.auth.secret_key.as_deref(), Some("abc"));
    }

    #[test]
    fn require_auth_stays_on_for_non_false_values() {
        let cli = Cli::parse_from(["smartsheet-mcp-gateway", "--require-auth", "yes"]);
        assert_eq!(cli.require_auth, Some(true));
    }

    #[test]
    fn debug_flag_lowers_default_log_level() {
        let cli = Cli::parse_from(["smartsheet-mcp-gateway", "--debug", "true"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(cli.log_level(config.debug), "debug");

        let cli = Cli::parse_from([
            "smartsheet-mcp-gateway",
            "--debug",
            "true",
            "--log-level",
            "warn",
        ]);
        assert_eq!(cli.log_level(true), "warn");
    }

    #[test]
    fn config_debug_lowers_default_log_level() {
        let cli = Cli::parse_from(["smartsheet-mcp-gateway"]);
        let mut config = Config {
            debug: true,
            ..Config::default()
        };
        cli.apply_overrides(&mut config);
        assert!(config.debug);
        assert_eq!(cli.log_level(config.debug), "debug");
        assert_eq!(cli.log_level(false), "info");
    }
}
