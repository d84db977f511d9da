//! oEmbed metadata lookup.

use serde::Deserialize;
use tracing::debug;

use crate::{ClientError, MediaClient};

/// oEmbed response for a Mediawire asset.
///
/// Mediawire answers with the standard oEmbed video fields. Everything is
/// optional here; hosts differ in which fields they populate and an absent
/// field is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OembedMetadata {
    /// Media title.
    pub title: Option<String>,
    /// oEmbed resource type, `video` for Mediawire assets.
    #[serde(rename = "type")]
    pub media_type: Option<String>,
    /// Provider display name.
    pub provider_name: Option<String>,
    /// Thumbnail image URL.
    pub thumbnail_url: Option<String>,
    /// Thumbnail width in pixels.
    pub thumbnail_width: Option<u32>,
    /// Thumbnail height in pixels.
    pub thumbnail_height: Option<u32>,
    /// Player width in pixels.
    pub width: Option<u32>,
    /// Player height in pixels.
    pub height: Option<u32>,
    /// Provider-supplied embed markup.
    pub html: Option<String>,
}

impl MediaClient {
    /// Fetch oEmbed metadata from a Mediawire host.
    ///
    /// `oembed_url` is the endpoint URL derived during asset URL parsing
    /// (`AssetUrl::oembed_url`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::HttpResponse`] for any non-200 status and
    /// [`ClientError::HttpRequest`] for transport or JSON decoding failures.
    pub fn fetch_metadata(&self, oembed_url: &str) -> Result<OembedMetadata, ClientError> {
        debug!("fetching oEmbed metadata from {oembed_url}");

        let response = self
            .agent
            .get(oembed_url)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status != 200 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ClientError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body.read_json()?)
    }
}
