//! Remote file retrieval for `source` directives.
use std::io::Read;
use std::time::Duration;

use crate::error::FetchError;

/// `User-Agent` header sent with every download.
const USER_AGENT: &str = concat!("meta-init/", env!("CARGO_PKG_VERSION"));

/// Opens a readable stream for a URL.
///
/// Implemented over HTTP by [`HttpFetcher`]; tests substitute a mock so that
/// file materialization can be exercised without a network.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// Request `url` and return its body as a stream.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Request`] when the request cannot be completed or
    /// the server answers with a non-success status.
    fn open(&self, url: &str) -> Result<Box<dyn Read>, FetchError>;
}

/// [`Fetcher`] backed by a blocking [`ureq`] agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    /// Create a fetcher whose requests fail after `timeout` (no limit when `None`).
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build()
            .into();
        Self { agent, timeout }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("agent", &"<ureq::Agent>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Fetcher for HttpFetcher {
    fn open(&self, url: &str) -> Result<Box<dyn Read>, FetchError> {
        let response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Box::new(response.into_body().into_reader()))
    }
}
