//! `mw launch` command implementation.

use std::path::PathBuf;

use clap::Args;
use mw_config::{CliSettings, Config, ProviderConfig};
use mw_lti::{HostUser, LaunchRequest, build_launch_page};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the launch command.
#[derive(Args)]
pub(crate) struct LaunchArgs {
    /// Mediawire media URL to launch.
    url: String,

    /// Host user id sent as the LTI user identifier.
    #[arg(long, default_value = "1")]
    user_id: String,

    /// Host username; feeds the LTI name fields.
    #[arg(long, default_value = "admin")]
    username: String,

    /// Host user email address.
    #[arg(long, default_value = "")]
    email: String,

    /// Path of the host page embedding the media.
    #[arg(long, default_value = "/")]
    page_path: String,

    /// Base URL of the host application, no trailing slash.
    #[arg(long, default_value = "http://localhost")]
    base_url: String,

    /// Host site name, used for the institution-name fallback.
    #[arg(long, default_value = "Drupal")]
    site_name: String,

    /// Launch presentation locale.
    #[arg(long, default_value = "en")]
    locale: String,

    /// Mediawire site URL (overrides config).
    #[arg(long)]
    site_url: Option<String>,

    /// LTI consumer key (overrides config).
    #[arg(long)]
    lti_key: Option<String>,

    /// LTI consumer secret (overrides config).
    #[arg(long)]
    lti_secret: Option<String>,

    /// Mediawire group for the launch context (overrides config).
    #[arg(long)]
    group_name: Option<String>,

    /// Write the launch page to a file instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LaunchArgs {
    /// Execute the launch command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the launch is refused.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        // Load config
        let cli_settings = CliSettings {
            site_url: self.site_url,
            lti_key: self.lti_key,
            lti_secret: self.lti_secret,
            group_name: self.group_name,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let provider = require_provider(&config, &output)?;

        // The CLI invoker counts as an authenticated user holding the launch
        // permission; the refusal paths guard host integrations.
        let user = HostUser {
            id: self.user_id,
            username: self.username,
            email: self.email,
            authenticated: true,
            can_launch: true,
        };
        let request = LaunchRequest {
            target_url: self.url,
            page_path: self.page_path,
            host_base_url: self.base_url,
            site_name: self.site_name,
            locale: self.locale,
            host_version: version.to_owned(),
        };

        let page = build_launch_page(provider, &user, &request)?;

        match &self.out {
            Some(path) => {
                std::fs::write(path, &page)?;
                output.success(&format!("Launch page written to {}", path.display()));
            }
            None => output.emit(&page),
        }
        Ok(())
    }
}

fn require_provider<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a ProviderConfig, CliError> {
    config.provider.as_ref().ok_or_else(|| {
        output.error("Error: provider configuration required in mw.toml");
        output.info("\nAdd the following to your mw.toml:");
        output.info("\n[provider]");
        output.info(r#"site_url = "https://support.example.com""#);
        output.info(r#"lti_key = "your-key""#);
        output.info(r#"lti_secret = "your-secret""#);
        output.info(r#"group_name = "your-group""#);
        CliError::Validation("provider configuration required".to_owned())
    })
}
