//! Mediawire oEmbed client for MW.
//!
//! [`MediaClient`] talks to a Mediawire host's oEmbed endpoint to look up
//! asset metadata (title, thumbnail, dimensions) and caches thumbnail images
//! on the local filesystem. Requests are synchronous with a global timeout;
//! error statuses surface as [`ClientError::HttpResponse`] instead of being
//! swallowed, so callers decide whether to degrade.

mod metadata;
mod oembed;
mod thumbnail;

pub use metadata::MetadataField;
pub use oembed::OembedMetadata;

use std::time::Duration;

use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Mediawire API client.
pub struct MediaClient {
    agent: Agent,
}

impl MediaClient {
    /// Create a client with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for MediaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Error from Mediawire API operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed (network error, timeout, malformed response body).
    #[error("HTTP request failed")]
    HttpRequest(#[from] ureq::Error),

    /// Server returned a non-200 status.
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// I/O error while writing the thumbnail cache.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
