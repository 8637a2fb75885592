//! HTTP client bound to one Smartsheet credential
//!
//! # Security
//!
//! - The API key is only ever placed in the `Authorization` header
//! - It is redacted from `Debug` output and never logged
//! - Error bodies are truncated before being surfaced to callers

use std::fmt;

use reqwest::{Client, Method, RequestBuilder, Response, header};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::cache::normalize_endpoint;
use crate::{Error, Result};

/// Maximum number of characters of an API error body surfaced to callers
const MAX_ERROR_BODY: usize = 500;

/// Client for the Smartsheet REST API
pub struct SmartsheetClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl SmartsheetClient {
    /// Create a client for an API key and endpoint (default endpoint if `None`)
    pub fn new(api_key: impl Into<String>, endpoint: Option<&str>) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint);
        // Trailing slash so relative paths extend the version segment
        let base_url = Url::parse(&format!("{endpoint}/"))
            .map_err(|e| Error::Config(format!("Invalid Smartsheet endpoint '{endpoint}': {e}")))?;

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Credential-less client used only to enumerate tool registrations
    pub fn placeholder() -> Result<Self> {
        Self::new(String::new(), None)
    }

    /// Whether this client carries no credential
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.api_key.is_empty()
    }

    /// Base URL requests are resolved against
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// GET a resource
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request).await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request).await
    }

    /// POST a JSON body with query parameters
    pub async fn post_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> Result<Value> {
        let request = self.request(Method::POST, path)?.query(query).json(body);
        self.send(request).await
    }

    /// PUT a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(request).await
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.request(Method::DELETE, path)?.query(query);
        self.send(request).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if self.is_placeholder() {
            return Err(Error::InvalidParams(
                "No Smartsheet API key bound to this client".to_string(),
            ));
        }

        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Internal(format!("Invalid API path '{path}': {e}")))?;

        debug!(method = %method, url = %url, "Smartsheet request");

        Ok(self
            .http
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl fmt::Debug for SmartsheetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartsheetClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &if self.is_placeholder() { "<none>" } else { "<redacted>" })
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_ENDPOINT;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_endpoint_when_none() {
        let client = SmartsheetClient::new("token", None).unwrap();
        assert_eq!(client.base_url(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn custom_endpoint_trailing_slash_is_normalized() {
        let client =
            SmartsheetClient::new("token", Some("https://api.smartsheet.eu/2.0/")).unwrap();
        assert_eq!(client.base_url(), "https://api.smartsheet.eu/2.0");
    }

    #[test]
    fn invalid_endpoint_is_config_error() {
        let err = SmartsheetClient::new("token", Some("not a url")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = SmartsheetClient::new("very-secret", None).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn placeholder_refuses_requests() {
        let client = SmartsheetClient::placeholder().unwrap();
        assert!(client.is_placeholder());
        let err = client.get("users/me", &[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }
}
