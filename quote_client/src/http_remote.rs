//! Blocking HTTP remote source.
//!
//! `GET <endpoint>` returns the remote collection as a JSON array; `POST <endpoint>`
//! publishes a quote and the response body is discarded.
use log::debug;
use quote_common::QuoteError;
use quote_common::Result;
use quote_common::quote::Quote;
use quote_common::remote::{NewPost, RemoteSource, ServerPost};
use reqwest::blocking::Client;
use std::time::Duration;

/// Request timeout for both fetch and publish.
const TIMEOUT_SECS: u64 = 10;

/// Remote source talking to a JSON collection endpoint.
pub struct HttpRemote {
    client: Client,
    endpoint: String,
}

impl HttpRemote {
    /// Creates a client for `endpoint`.
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| QuoteError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl RemoteSource for HttpRemote {
    fn fetch(&self) -> Result<Vec<ServerPost>> {
        debug!("GET {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| QuoteError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Network(format!("Server responded with {}", status)));
        }

        response
            .json::<Vec<ServerPost>>()
            .map_err(|e| QuoteError::Network(format!("Failed to parse server response: {}", e)))
    }

    fn post(&self, quote: &Quote) -> Result<()> {
        debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&NewPost::from(quote))
            .send()
            .map_err(|e| QuoteError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Network(format!("Server responded with {}", status)));
        }
        Ok(())
    }
}
