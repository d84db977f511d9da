//! `mw embed` command implementation.

use std::path::PathBuf;

use clap::Args;
use mw_config::{CliSettings, Config};
use mw_embed::{Embed, PageContext, rewrite_embed_tokens};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the embed command.
#[derive(Args)]
pub(crate) struct EmbedArgs {
    /// Mediawire media URL to embed.
    url: Option<String>,

    /// Rewrite embed tokens in the given file instead of embedding one URL.
    #[arg(long, conflicts_with = "url")]
    filter: Option<PathBuf>,

    /// Route playback through the signed LTI launch page.
    #[arg(long)]
    lti: bool,

    /// Title of the host page containing the embed.
    #[arg(long, default_value = "")]
    page_title: String,

    /// Path of the host page containing the embed.
    #[arg(long, default_value = "/")]
    page_path: String,

    /// Embed width in pixels (overrides config).
    #[arg(long)]
    width: Option<u32>,

    /// Embed height in pixels (overrides config).
    #[arg(long)]
    height: Option<u32>,

    /// Write the markup to a file instead of stdout.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl EmbedArgs {
    /// Execute the embed command.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a URL nor `--filter` is given, or if
    /// configuration loading or file I/O fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        // Load config
        let cli_settings = CliSettings {
            width: self.width,
            height: self.height,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let page = PageContext {
            title: self.page_title,
            path: self.page_path,
        };

        let html = if let Some(path) = &self.filter {
            let text = std::fs::read_to_string(path)?;
            rewrite_embed_tokens(&text, self.lti, &config, &page)
        } else if let Some(url) = &self.url {
            let embed = Embed::build(url, self.lti, &config, &page);
            if let Embed::Error { message } = &embed {
                output.warning(message);
            }
            embed.to_html()
        } else {
            return Err(CliError::Validation(
                "a media URL or --filter file is required".to_owned(),
            ));
        };

        match &self.out {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Embed markup written to {}", path.display()));
            }
            None => output.emit(&html),
        }
        Ok(())
    }
}
