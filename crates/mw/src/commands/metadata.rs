//! `mw metadata` command implementation.

use clap::Args;
use mw_asset::AssetUrl;
use mw_client::{MediaClient, MetadataField, OembedMetadata};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the metadata command.
#[derive(Args)]
pub(crate) struct MetadataArgs {
    /// Mediawire media URL to resolve metadata for.
    url: String,

    /// Resolve a single field (e.g. `shortcode`, `title`, `thumbnail_url`).
    #[arg(short, long)]
    field: Option<String>,

    /// Resolve from the URL alone, without contacting the oEmbed endpoint.
    #[arg(long)]
    no_fetch: bool,
}

impl MetadataArgs {
    /// Execute the metadata command.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not a valid asset URL or the field
    /// name is unknown.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let asset = AssetUrl::parse(&self.url);
        if !asset.is_valid_asset_url() {
            return Err(CliError::Validation(format!(
                "not a valid Mediawire asset URL: {}",
                asset.url()
            )));
        }

        let oembed = if self.no_fetch {
            None
        } else {
            fetch_oembed(&output, &asset)
        };

        if let Some(name) = &self.field {
            let Some(field) = MetadataField::parse(name) else {
                return Err(CliError::Validation(format!(
                    "unknown metadata field: {name}"
                )));
            };
            match field.resolve(&asset, oembed.as_ref()) {
                Some(value) => output.emit(&value),
                None => output.warning(&format!("no value for {name}")),
            }
            return Ok(());
        }

        for field in MetadataField::ALL {
            if let Some(value) = field.resolve(&asset, oembed.as_ref()) {
                output.info(&format!("{}: {value}", field.as_str()));
            }
        }
        Ok(())
    }
}

/// Fetch oEmbed metadata, degrading to URL-only resolution on failure.
fn fetch_oembed(output: &Output, asset: &AssetUrl) -> Option<OembedMetadata> {
    let oembed_url = asset.oembed_url()?;
    match MediaClient::new().fetch_metadata(oembed_url) {
        Ok(metadata) => Some(metadata),
        Err(err) => {
            output.warning(&format!("oEmbed lookup failed: {err}"));
            None
        }
    }
}
