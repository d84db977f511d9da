//! Iframe embed construction for MW.
//!
//! Builds the markup that plays a Mediawire asset inside a host page. A
//! viewer who is signed in to the host and allowed to launch gets an iframe
//! routed through the host's LTI launch page, so the provider can establish
//! their session; everyone else gets the media URL embedded directly.
//!
//! The [`filter`] module rewrites legacy `[mediawire:url]` tokens in stored
//! page content into the same embed markup.

mod filter;

pub use filter::rewrite_embed_tokens;

use std::collections::BTreeMap;

use mw_asset::AssetUrl;
use mw_config::Config;

/// Host page the embed is rendered on.
///
/// Carried through the launch route query string so the launch page can
/// report where the viewer came from.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    /// Page title.
    pub title: String,
    /// Site-relative page path, e.g. `/node/1`.
    pub path: String,
}

/// A constructed embed, ready to render with [`Embed::to_html`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    /// Playable media iframe.
    Iframe {
        /// Iframe source URL.
        src: String,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
    /// Inline notice shown in place of the media.
    Error {
        /// End-user message.
        message: String,
    },
}

impl Embed {
    /// Construct an embed for a Mediawire media URL.
    ///
    /// When `use_lti_launch` is set and the target belongs to the configured
    /// Mediawire site, the iframe source routes through the host launch page
    /// (`provider.launch_path`); otherwise the media URL is used directly.
    /// Invalid configuration or an invalid target produces an [`Embed::Error`]
    /// carrying the end-user message.
    #[must_use]
    pub fn build(
        target_url: &str,
        use_lti_launch: bool,
        config: &Config,
        page: &PageContext,
    ) -> Self {
        let (config_site_url, launch_path) = config.provider.as_ref().map_or(("", ""), |p| {
            (p.site_url.as_str(), p.launch_path.as_str())
        });

        let site = AssetUrl::parse(config_site_url);
        if !site.is_valid_site_url() {
            return Self::Error {
                message: "Mediawire site URL is not properly configured.".to_owned(),
            };
        }

        let target = AssetUrl::parse(target_url);
        let Some(asset_url) = target.asset_url() else {
            return Self::Error {
                message: "Unable to load Mediawire media due to invalid URL.".to_owned(),
            };
        };

        // Media hosted on another Mediawire site can only be embedded
        // directly; the launch page rejects foreign hosts.
        let is_from_configured_site = target.host() == site.host();

        let src = if use_lti_launch && is_from_configured_site {
            let params = effective_params(&target, config);
            launch_src(launch_path, asset_url, &params, page)
        } else {
            target.url().to_owned()
        };

        Self::Iframe {
            src,
            width: target.width().unwrap_or(config.embed.default_width),
            height: target.height().unwrap_or(config.embed.default_height),
        }
    }

    /// Render the embed as an HTML snippet.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Iframe { src, width, height } => format!(
                r#"<iframe src="{}" frameborder="0" allow="autoplay *; encrypted-media *;fullscreen *;" allowfullscreen webkitallowfullscreen mozallowfullscreen allowtransparency height="{height}px" width="{width}px" class="media-embed"></iframe>"#,
                escape_html(src)
            ),
            Self::Error { message } => format!("<div>{}</div>", escape_html(message)),
        }
    }
}

/// Player parameters for the launched media URL: the target's allow-listed
/// query params with configured display defaults filled in where absent.
fn effective_params(target: &AssetUrl, config: &Config) -> BTreeMap<String, String> {
    let mut params = target.query_params();
    let embed = &config.embed;

    if !params.contains_key("share") && !embed.show_share {
        params.insert("share".to_owned(), "false".to_owned());
    }
    if !params.contains_key("title") && !embed.show_title {
        params.insert("title".to_owned(), "false".to_owned());
    }
    if !params.contains_key("autoplay") && embed.autoplay {
        params.insert("autoplay".to_owned(), "true".to_owned());
    }
    if !params.contains_key("cc_load_policy") && embed.show_captions {
        params.insert("cc_load_policy".to_owned(), "1".to_owned());
    }

    params
}

/// Build the iframe URL routed through the host launch page.
///
/// The media URL and page context values are form-encoded once before query
/// serialization, so they arrive double-encoded on the wire. The launch
/// handler decodes its query values once more after normal query parsing.
fn launch_src(
    launch_path: &str,
    asset_url: &str,
    params: &BTreeMap<String, String>,
    page: &PageContext,
) -> String {
    let media_query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    let media_url = format!("{asset_url}?{media_query}");

    let launch_query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", &form_encode(&media_url))
        .append_pair("page_title", &form_encode(&page.title))
        .append_pair("page_path", &form_encode(&page.path))
        .finish();
    format!("{launch_path}?{launch_query}")
}

fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
