//! `mw inspect` command implementation.

use clap::Args;
use mw_asset::AssetUrl;
use mw_client::MediaClient;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Mediawire media URL to inspect.
    url: String,

    /// Contact the oEmbed endpoint to check that the asset exists.
    #[arg(short, long)]
    probe: bool,
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// # Errors
    ///
    /// Returns an error if `--probe` is requested and the URL has no oEmbed
    /// endpoint, or the probe itself fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let asset = AssetUrl::parse(&self.url);

        output.highlight(&format!("URL: {}", asset.url()));
        let validity = if asset.is_valid_asset_url() {
            "yes"
        } else {
            "no"
        };
        output.info(&format!("Valid asset URL: {validity}"));

        if let Some(host) = asset.host() {
            output.info(&format!("Host: {host}"));
        }
        if let Some(site_url) = asset.site_url() {
            output.info(&format!("Site URL: {site_url}"));
        }
        if let Some(endpoint) = asset.lti_endpoint_url() {
            output.info(&format!("LTI endpoint: {endpoint}"));
        }
        if let Some(shortcode) = asset.shortcode() {
            output.info(&format!("Shortcode: {shortcode}"));
        }
        if let Some(asset_url) = asset.asset_url() {
            output.info(&format!("Asset URL: {asset_url}"));
        }
        if let Some(oembed_url) = asset.oembed_url() {
            output.info(&format!("oEmbed URL: {oembed_url}"));
        }

        let params = asset.query_params();
        if !params.is_empty() {
            output.info("Query parameters:");
            for (name, value) in &params {
                output.info(&format!("  {name} = {value}"));
            }
        }
        if let Some(width) = asset.width() {
            output.info(&format!("Requested width: {width}"));
        }
        if let Some(height) = asset.height() {
            output.info(&format!("Requested height: {height}"));
        }

        if self.probe {
            probe_oembed(&output, &asset)?;
        }
        Ok(())
    }
}

/// Ask the oEmbed endpoint whether the asset exists.
fn probe_oembed(output: &Output, asset: &AssetUrl) -> Result<(), CliError> {
    let Some(oembed_url) = asset.oembed_url() else {
        return Err(CliError::Validation(
            "URL is not a Mediawire asset URL; nothing to probe".to_owned(),
        ));
    };

    let client = MediaClient::new();
    let metadata = client.fetch_metadata(oembed_url)?;
    output.success("oEmbed probe: asset found");
    if let Some(title) = &metadata.title {
        output.info(&format!("Title: {title}"));
    }
    if let Some(provider) = &metadata.provider_name {
        output.info(&format!("Provider: {provider}"));
    }
    Ok(())
}
