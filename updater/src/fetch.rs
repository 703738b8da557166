//! Upstream manifest retrieval.
//!
//! Provides a trait-based abstraction over the single HTTP GET the updater
//! performs, so the pipeline can be exercised without network access.

use std::sync::OnceLock;
use std::time::Duration;

/// Global timeout for the upstream manifest request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching a manifest document as raw bytes.
///
/// # Examples
///
/// ```no_run
/// use pob_manifest_updater::fetch::{HttpFetcher, ManifestFetcher};
///
/// let bytes = HttpFetcher.fetch("https://example.com/manifest.xml")?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), pob_manifest_updater::fetch::FetchError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ManifestFetcher {
    /// Fetch the body at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out, or the body cannot
    /// be read.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Errors arising from the upstream request.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("fetch failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The upstream server answered with HTTP 404.
    #[error("manifest not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },
}

/// HTTP-based fetcher using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl ManifestFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::debug!("GET {url}");
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let bytes = response
            .into_body()
            .read_to_vec()
            .map_err(|e| FetchError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        log::debug!("received {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(FETCH_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
