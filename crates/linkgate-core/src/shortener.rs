//! Link shortening service client
//!
//! TinyURL's `api-create.php` answers a `GET ?url=<long url>` with the short
//! URL as a bare text body. No retries: a failed call is reported once.

use crate::config::{GateSettings, SHORT_URL_PREFIX};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Url};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while calling the shortener
#[derive(Error, Debug)]
pub enum ShortenError {
    /// The configured endpoint is not a valid URL
    #[error("Invalid shortener endpoint: {0}")]
    InvalidEndpoint(String),
    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
    /// Error during network communication
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success HTTP status
    #[error("API error: {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },
}

/// Interface for link shortening services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Shortener: Send + Sync {
    /// Shorten `long_url` and return the raw response payload.
    ///
    /// The payload is not validated here; see [`is_short_url`].
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError>;
}

/// Whether a shortener payload is a usable short link
#[must_use]
pub fn is_short_url(payload: &str) -> bool {
    !payload.is_empty() && payload.starts_with(SHORT_URL_PREFIX)
}

/// TinyURL-backed shortener
pub struct TinyUrlClient {
    http: HttpClient,
    api_url: String,
}

impl TinyUrlClient {
    /// Create a client for `api_url` with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns `ShortenError::Client` if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ShortenError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShortenError::Client(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    /// Create a client from the bot settings
    ///
    /// # Errors
    ///
    /// Returns `ShortenError::Client` if the HTTP client cannot be built.
    pub fn from_settings(settings: &GateSettings) -> Result<Self, ShortenError> {
        Self::new(
            settings.shortener_api_url.clone(),
            settings.shortener_timeout(),
        )
    }

    /// Request URL with `long_url` percent-encoded into the `url` parameter.
    ///
    /// # Errors
    ///
    /// Returns `ShortenError::InvalidEndpoint` if the configured endpoint cannot be parsed.
    pub fn request_url(&self, long_url: &str) -> Result<Url, ShortenError> {
        Url::parse_with_params(&self.api_url, &[("url", long_url)])
            .map_err(|e| ShortenError::InvalidEndpoint(format!("{}: {e}", self.api_url)))
    }
}

#[async_trait]
impl Shortener for TinyUrlClient {
    async fn shorten(&self, long_url: &str) -> Result<String, ShortenError> {
        let url = self.request_url(long_url)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ShortenError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShortenError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ShortenError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_short_url() {
        assert!(is_short_url("https://tinyurl.com/abc123"));
        assert!(!is_short_url(""));
        assert!(!is_short_url("Error"));
        assert!(!is_short_url("http://tinyurl.com/abc123"));
        assert!(!is_short_url("https://evil.example/https://tinyurl.com"));
    }

    #[test]
    fn test_request_url_encodes_long_url() -> Result<(), ShortenError> {
        let client = TinyUrlClient::new(
            "https://tinyurl.com/api-create.php",
            Duration::from_secs(5),
        )?;
        let long = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42";
        let url = client.request_url(long)?;

        assert_eq!(url.host_str(), Some("tinyurl.com"));
        assert_eq!(url.path(), "/api-create.php");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("url".to_string(), long.to_string())]);
        // The inner query string must not leak into the outer one
        assert!(!url.as_str().contains("&t=42"));
        Ok(())
    }

    #[test]
    fn test_invalid_endpoint() -> Result<(), ShortenError> {
        let client = TinyUrlClient::new("not a url", Duration::from_secs(5))?;
        assert!(matches!(
            client.request_url("https://example.com"),
            Err(ShortenError::InvalidEndpoint(_))
        ));
        Ok(())
    }
}
