//! Smartsheet REST API client

mod client;

pub use client::SmartsheetClient;
