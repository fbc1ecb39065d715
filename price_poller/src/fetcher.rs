//! Fetch capability used by the workers.
//!
//! A fetcher turns a symbol into the raw bytes of the endpoint's answer. It has no
//! retry logic of its own; every error it returns is treated as transient by the
//! worker. `HttpFetcher` issues `GET {source}?{symbol_param}={symbol}` through a
//! blocking `reqwest` client whose timeout bounds each request.
use log::debug;
use price_common::PollerError;
use price_common::PollerConfig;
use price_common::net::query;
use reqwest::Url;
use reqwest::blocking::Client;
use std::time::Duration;

/// Source of raw price responses.
pub trait Fetch: Send + Sync {
    /// Fetch the raw response for `symbol`.
    fn fetch(&self, symbol: &str) -> Result<Vec<u8>, PollerError>;
}

/// HTTP implementation of [`Fetch`].
pub struct HttpFetcher {
    client: Client,
    source: Url,
    symbol_param: String,
}

impl HttpFetcher {
    /// Build a fetcher for `source`, failing fast on an unparsable URL.
    pub fn new(source: &str, symbol_param: &str, timeout: Duration) -> Result<Self, PollerError> {
        let source = Url::parse(source)
            .map_err(|e| PollerError::Config(format!("invalid source url '{}': {}", source, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollerError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            source,
            symbol_param: symbol_param.to_string(),
        })
    }

    /// Build a fetcher from the endpoint settings of `config`.
    pub fn from_config(config: &PollerConfig) -> Result<Self, PollerError> {
        Self::new(&config.source, &config.symbol_param, config.request_timeout())
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, symbol: &str) -> Result<Vec<u8>, PollerError> {
        debug!("GET {}?{}", self.source, query(&self.symbol_param, symbol));
        let response = self
            .client
            .get(self.source.clone())
            .query(&[(self.symbol_param.as_str(), symbol)])
            .send()
            .map_err(|e| PollerError::Transport(format!("error sending get request: {}", e)))?
            .error_for_status()
            .map_err(|e| PollerError::Transport(format!("unexpected response status: {}", e)))?;

        let body = response
            .bytes()
            .map_err(|e| PollerError::Transport(format!("error reading response body: {}", e)))?;
        Ok(body.to_vec())
    }
}
