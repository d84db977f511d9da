//! `mw thumbnail` command implementation.

use std::path::PathBuf;

use clap::Args;
use mw_asset::AssetUrl;
use mw_client::MediaClient;
use mw_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the thumbnail command.
#[derive(Args)]
pub(crate) struct ThumbnailArgs {
    /// Mediawire media URL whose thumbnail to cache.
    url: String,

    /// Thumbnail cache directory (overrides config).
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ThumbnailArgs {
    /// Execute the thumbnail command.
    ///
    /// Prints the cached file path on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, caching is disabled, the
    /// oEmbed lookup fails, or the download fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Load config
        let cli_settings = CliSettings {
            thumbnail_dir: self.dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let thumbnails = &config.thumbnails_resolved;
        if !thumbnails.enabled {
            return Err(CliError::Validation(
                "thumbnail caching is disabled in config".to_owned(),
            ));
        }

        let asset = AssetUrl::parse(&self.url);
        let (Some(oembed_url), Some(shortcode)) = (asset.oembed_url(), asset.shortcode()) else {
            return Err(CliError::Validation(format!(
                "not a valid Mediawire asset URL: {}",
                asset.url()
            )));
        };

        let client = MediaClient::new();
        let metadata = client.fetch_metadata(oembed_url)?;
        let Some(thumbnail_url) = metadata.thumbnail_url else {
            return Err(CliError::Validation("asset has no thumbnail".to_owned()));
        };

        output.info(&format!("Fetching {thumbnail_url}..."));
        let path = client.cached_thumbnail(&thumbnails.directory, shortcode, &thumbnail_url)?;
        output.emit(&path.display().to_string());
        Ok(())
    }
}
