//! Network side of prefetching

use thiserror::Error;

/// Errors that can occur while prefetching one URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// IO error while discarding the body
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL cannot be fetched
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Issues one low-priority fetch without evaluating the response
pub trait Fetcher {
    /// Fetch `url` so it lands in the cache
    fn fetch(&self, url: &str) -> Result<(), FetchError>;
}

impl<F> Fetcher for F
where
    F: Fn(&str) -> Result<(), FetchError>,
{
    fn fetch(&self, url: &str) -> Result<(), FetchError> {
        self(url)
    }
}

#[cfg(feature = "http")]
pub use http::{HttpFetcher, REQUEST_TIMEOUT};

#[cfg(feature = "http")]
mod http {
    use super::{FetchError, Fetcher};
    use reqwest::blocking::Client;
    use std::time::Duration;

    /// Per-request timeout
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Blocking HTTP fetcher; response bodies are read and dropped
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        /// Create a fetcher with the default timeout
        pub fn new() -> Result<Self, FetchError> {
            let client = Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(concat!("qwikloader-prefetch/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { client })
        }

        /// Use an existing client
        pub fn with_client(client: Client) -> Self {
            Self { client }
        }
    }

    impl Fetcher for HttpFetcher {
        fn fetch(&self, url: &str) -> Result<(), FetchError> {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(FetchError::InvalidUrl(url.to_string()));
            }

            let mut response = self
                .client
                .get(url)
                .header("Purpose", "prefetch")
                .send()?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::HttpStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            std::io::copy(&mut response, &mut std::io::sink())?;
            Ok(())
        }
    }

}
