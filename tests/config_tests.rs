//! Configuration file loading tests

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use smartsheet_mcp_gateway::Error;
use smartsheet_mcp_gateway::cache::EvictionPolicy;
use smartsheet_mcp_gateway::config::Config;

fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// A full file overrides every section
#[test]
fn test_load_full_file() {
    let file = yaml_file(
        r"
server:
  host: 127.0.0.1
  port: 8081
  cors: false
auth:
  require_auth: false
  secret_key: from-file
smartsheet:
  default_endpoint: https://api.smartsheet.eu/2.0
cache:
  capacity: 10
  eviction: lru
debug: true
",
    );

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8081);
    assert!(!config.server.cors);
    assert!(!config.auth.require_auth);
    assert_eq!(config.auth.resolve_secret_key().as_deref(), Some("from-file"));
    assert_eq!(config.smartsheet.default_endpoint, "https://api.smartsheet.eu/2.0");
    assert_eq!(config.cache.capacity, 10);
    assert_eq!(config.cache.eviction, EvictionPolicy::LeastRecentlyUsed);
    assert!(config.debug);
}

/// Missing sections keep their defaults
#[test]
fn test_partial_file_keeps_defaults() {
    let file = yaml_file("server:\n  port: 9000\n");

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(config.auth.require_auth);
    assert_eq!(config.cache.capacity, 100);
    assert_eq!(config.cache.eviction, EvictionPolicy::InsertionOrder);
}

/// A named file that does not exist is an error
#[test]
fn test_missing_file() {
    let err = Config::load(Some(std::path::Path::new("/nonexistent/gateway.yaml"))).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("Config file not found"));
}

/// Values the server cannot run with are rejected at load time
#[test]
fn test_invalid_values_rejected() {
    let file = yaml_file("cache:\n  capacity: 0\n");
    assert!(matches!(Config::load(Some(file.path())), Err(Error::Config(_))));

    let file = yaml_file("smartsheet:\n  default_endpoint: not a url\n");
    assert!(matches!(Config::load(Some(file.path())), Err(Error::Config(_))));
}

/// Unknown eviction policies fail to parse
#[test]
fn test_unknown_eviction_policy() {
    let file = yaml_file("cache:\n  eviction: random\n");
    assert!(matches!(Config::load(Some(file.path())), Err(Error::Config(_))));
}

/// Missing env files are skipped
#[test]
fn test_missing_env_file_is_skipped() {
    let file = yaml_file("env_files:\n  - /nonexistent/.env\n");
    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.env_files, vec!["/nonexistent/.env".to_string()]);
}
