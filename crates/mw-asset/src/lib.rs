//! Mediawire asset URL parsing for MW.
//!
//! A Mediawire URL identifies a media asset by shortcode:
//! `https://{host}/w/{shortcode}/?start=10&share=false`. [`AssetUrl::parse`]
//! breaks such a URL into its site and asset parts without ever failing;
//! malformed input simply produces a descriptor whose validity accessors
//! return false. Callers check [`AssetUrl::is_valid_site_url`] /
//! [`AssetUrl::is_valid_asset_url`] before reading the derived fields.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Query parameters forwarded to the embedded player.
///
/// Anything outside this list is dropped during parsing so that arbitrary
/// query input can never reach the provider embed.
pub const ALLOWED_QUERY_PARAMS: [&str; 11] = [
    "audio_only",
    "autoplay",
    "cc_load_policy",
    "controls",
    "embed_nonce",
    "embed_signature",
    "end",
    "seek_mode",
    "share",
    "start",
    "title",
];

/// Path of the oEmbed endpoint on a Mediawire host.
const OEMBED_PATH: &str = "/api/oembed/";

/// Path of the LTI launch endpoint on a Mediawire host.
const LTI_PATH: &str = "/api/ltix/";

static SHORTCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/w/([\w-]+)/?$").unwrap());

/// A parsed Mediawire URL.
///
/// Parsing is total: any string produces a descriptor. The site fields are
/// present iff the input is an absolute URL with a host; the asset fields
/// are present iff the path additionally matches `/w/{shortcode}/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrl {
    url: String,
    site: Option<SiteParts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SiteParts {
    host: String,
    site_url: String,
    lti_endpoint_url: String,
    asset: Option<AssetParts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AssetParts {
    shortcode: String,
    asset_url: String,
    oembed_url: String,
    query_params: BTreeMap<String, String>,
    width: Option<u32>,
    height: Option<u32>,
}

impl AssetUrl {
    /// Parses a raw URL string into a descriptor.
    ///
    /// Input is trimmed first. The derived site and LTI endpoint URLs are
    /// always `https` regardless of the input scheme; the provider API is
    /// HTTPS only.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let url = raw.trim().to_owned();

        let Ok(parsed) = Url::parse(&url) else {
            return Self { url, site: None };
        };
        let Some(host) = parsed.host_str() else {
            return Self { url, site: None };
        };

        let host = host.to_owned();
        let site_url = format!("https://{host}");
        let lti_endpoint_url = format!("{site_url}{LTI_PATH}");

        let asset = SHORTCODE_RE.captures(parsed.path()).map(|caps| {
            let shortcode = caps[1].to_owned();
            let asset_url = format!("{site_url}/w/{shortcode}/");
            let encoded: String =
                url::form_urlencoded::byte_serialize(asset_url.as_bytes()).collect();
            let oembed_url = format!("{site_url}{OEMBED_PATH}?url={encoded}&format=json");

            let mut query_params = BTreeMap::new();
            let mut width = None;
            let mut height = None;
            for (key, value) in parsed.query_pairs() {
                match key.as_ref() {
                    "width" => width = value.parse().ok(),
                    "height" => height = value.parse().ok(),
                    key if ALLOWED_QUERY_PARAMS.contains(&key) => {
                        query_params.insert(key.to_owned(), value.into_owned());
                    }
                    _ => {}
                }
            }

            AssetParts {
                shortcode,
                asset_url,
                oembed_url,
                query_params,
                width,
                height,
            }
        });

        Self {
            url,
            site: Some(SiteParts {
                host,
                site_url,
                lti_endpoint_url,
                asset,
            }),
        }
    }

    /// True iff the input was an absolute URL with a non-empty host.
    #[must_use]
    pub fn is_valid_site_url(&self) -> bool {
        self.site.is_some()
    }

    /// True iff the input additionally carries a `/w/{shortcode}/` path.
    #[must_use]
    pub fn is_valid_asset_url(&self) -> bool {
        self.asset().is_some()
    }

    /// The trimmed input string, valid or not.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.host.as_str())
    }

    /// `https://{host}` for a valid site URL.
    #[must_use]
    pub fn site_url(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.site_url.as_str())
    }

    /// `https://{host}/api/ltix/` for a valid site URL.
    #[must_use]
    pub fn lti_endpoint_url(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.lti_endpoint_url.as_str())
    }

    #[must_use]
    pub fn shortcode(&self) -> Option<&str> {
        self.asset().map(|a| a.shortcode.as_str())
    }

    /// Canonical `https://{host}/w/{shortcode}/` form with trailing slash.
    #[must_use]
    pub fn asset_url(&self) -> Option<&str> {
        self.asset().map(|a| a.asset_url.as_str())
    }

    /// oEmbed endpoint URL with the canonical asset URL form-encoded into
    /// its `url` parameter.
    #[must_use]
    pub fn oembed_url(&self) -> Option<&str> {
        self.asset().map(|a| a.oembed_url.as_str())
    }

    /// Allow-listed player parameters from the input query string.
    ///
    /// Empty unless the URL is a valid asset URL.
    #[must_use]
    pub fn query_params(&self) -> BTreeMap<String, String> {
        self.asset()
            .map(|a| a.query_params.clone())
            .unwrap_or_default()
    }

    /// Numeric `width` override from the input query string, if any.
    ///
    /// Dimension overrides ride alongside the player parameters but are not
    /// part of the forwarded allow-list; the embed layer applies them over
    /// its configured defaults.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        self.asset().and_then(|a| a.width)
    }

    /// Numeric `height` override from the input query string, if any.
    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.asset().and_then(|a| a.height)
    }

    fn asset(&self) -> Option<&AssetParts> {
        self.site.as_ref().and_then(|s| s.asset.as_ref())
    }
}
