//! # reqwest Transport
//!
//! Production [`HttpTransport`] adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::errors::ShippingError;
use crate::ports::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Timeouts applied to every carrier call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl TransportConfig {
    /// Create configuration from environment variables.
    ///
    /// - `CARRIER_HTTP_TIMEOUT_SECS` (default: 30)
    /// - `CARRIER_HTTP_CONNECT_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`TransportConfig::from_env`] over an arbitrary lookup.
    /// Unparseable values fall back to the defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .map(Duration::from_secs)
        };

        Self {
            request_timeout: secs("CARRIER_HTTP_TIMEOUT_SECS").unwrap_or(defaults.request_timeout),
            connect_timeout: secs("CARRIER_HTTP_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.connect_timeout),
        }
    }
}

/// [`HttpTransport`] over a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client with the configured timeouts.
    pub fn new(config: &TransportConfig) -> Result<Self, ShippingError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ShippingError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ShippingError> {
        debug!(method = ?request.method, url = %request.url, "Sending carrier request");

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ShippingError::Transport(format!("timed out calling {}", request.url))
            } else if e.is_connect() {
                ShippingError::Transport(format!("cannot connect to {}", request.url))
            } else {
                ShippingError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ShippingError::Transport(format!("reading body: {e}")))?;

        debug!(status, bytes = body.len(), "Carrier responded");
        Ok(HttpResponse { status, body })
    }
}
