//! Local thumbnail caching.
//!
//! Thumbnails are written once into a cache directory and reused on every
//! later lookup, so media listings don't refetch images from the provider.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{ClientError, MediaClient};

impl MediaClient {
    /// Return a local path for an asset thumbnail, downloading it on first use.
    ///
    /// The cache file is `{dir}/mw_thumbnail_{shortcode}.jpg`. If it already
    /// exists it is returned immediately without touching the network.
    /// Failures are logged and surfaced; the caller may fall back to a
    /// placeholder image.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the cache directory or file cannot be
    /// written, and [`ClientError::HttpRequest`] / [`ClientError::HttpResponse`]
    /// if the download fails.
    pub fn cached_thumbnail(
        &self,
        dir: &Path,
        shortcode: &str,
        remote_url: &str,
    ) -> Result<PathBuf, ClientError> {
        let path = dir.join(format!("mw_thumbnail_{shortcode}.jpg"));
        if path.exists() {
            debug!("thumbnail cache hit: {}", path.display());
            return Ok(path);
        }

        if let Err(e) = fs::create_dir_all(dir) {
            warn!("could not prepare thumbnail directory {}: {e}", dir.display());
            return Err(e.into());
        }

        let response = match self.agent.get(remote_url).call() {
            Ok(response) => response,
            Err(e) => {
                warn!("could not download thumbnail from {remote_url}: {e}");
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status != 200 {
            warn!("could not download thumbnail from {remote_url}: status {status}");
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ClientError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let bytes = body.read_to_vec()?;
        fs::write(&path, &bytes)?;
        debug!("cached thumbnail at {}", path.display());
        Ok(path)
    }
}
