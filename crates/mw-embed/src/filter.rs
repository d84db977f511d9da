//! Legacy `[mediawire:url]` token rewriting.
//!
//! Before media references existed, host pages stored Mediawire embeds as
//! bracketed tokens in the page body. This filter rewrites each token into
//! the iframe embed markup so legacy content keeps playing.

use std::sync::LazyLock;

use regex::Regex;

use mw_config::Config;

use crate::{Embed, PageContext};

/// Matches `[mediawire:url]` tokens; the tag is case-insensitive.
static EMBED_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[mediawire:([^\]]+)\]").unwrap());

/// Replace every `[mediawire:url]` token in `text` with embed markup.
///
/// The captured URL is entity-decoded before parsing, since stored page
/// content escapes `&` in query strings. Text without tokens passes through
/// unchanged. `use_lti_launch` reflects whether the viewer is signed in and
/// allowed to launch; the decision is the caller's, the filter only routes.
#[must_use]
pub fn rewrite_embed_tokens(
    text: &str,
    use_lti_launch: bool,
    config: &Config,
    page: &PageContext,
) -> String {
    EMBED_TOKEN_RE
        .replace_all(text, |caps: &regex::Captures| {
            let target_url = decode_entities(&caps[1]);
            Embed::build(&target_url, use_lti_launch, config, page).to_html()
        })
        .into_owned()
}

/// Reverse the HTML escaping applied when the token was stored.
///
/// `&amp;` is decoded last so that `&amp;lt;` comes out as `&lt;`, not `<`.
fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> Config {
        toml::from_str(
            r#"
[provider]
site_url = "https://support.example.com"
lti_key = "my-dummy-key"
lti_secret = "my-dummy-secret"
group_name = "my-dummy-group"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_rewrite_single_token() {
        let text = "before [mediawire:https://support.example.com/w/CwAAAA/] after";
        let rewritten = rewrite_embed_tokens(text, false, &config(), &PageContext::default());

        let expected_embed = Embed::build(
            "https://support.example.com/w/CwAAAA/",
            false,
            &config(),
            &PageContext::default(),
        )
        .to_html();
        assert_eq!(rewritten, format!("before {expected_embed} after"));
    }

    #[test]
    fn test_rewrite_tag_case_insensitive() {
        let rewritten = rewrite_embed_tokens(
            "[MediaWire:https://support.example.com/w/CwAAAA/]",
            false,
            &config(),
            &PageContext::default(),
        );

        assert!(rewritten.starts_with("<iframe "));
        assert!(!rewritten.contains('['));
    }

    #[test]
    fn test_rewrite_decodes_entities_in_url() {
        let rewritten = rewrite_embed_tokens(
            "[mediawire:https://support.example.com/w/CwAAAA/?start=1&amp;end=5]",
            false,
            &config(),
            &PageContext::default(),
        );

        let expected_embed = Embed::build(
            "https://support.example.com/w/CwAAAA/?start=1&end=5",
            false,
            &config(),
            &PageContext::default(),
        )
        .to_html();
        assert_eq!(rewritten, expected_embed);
    }

    #[test]
    fn test_rewrite_multiple_tokens() {
        let text = "<p>[mediawire:https://support.example.com/w/AAAAAA/]</p>\
                    <p>[mediawire:https://support.example.com/w/BBBBBB/]</p>";
        let rewritten = rewrite_embed_tokens(text, false, &config(), &PageContext::default());

        assert!(rewritten.contains(r#"src="https://support.example.com/w/AAAAAA/""#));
        assert!(rewritten.contains(r#"src="https://support.example.com/w/BBBBBB/""#));
        assert!(rewritten.starts_with("<p>"));
        assert!(rewritten.ends_with("</p>"));
    }

    #[test]
    fn test_rewrite_leaves_plain_text_untouched() {
        let text = "nothing to see here, not even [brackets:like-this are safe]";
        let rewritten = rewrite_embed_tokens(text, false, &config(), &PageContext::default());

        assert_eq!(rewritten, text);
    }

    #[test]
    fn test_rewrite_invalid_url_becomes_error_notice() {
        let rewritten = rewrite_embed_tokens(
            "[mediawire:nonsense]",
            false,
            &config(),
            &PageContext::default(),
        );

        assert_eq!(
            rewritten,
            "<div>Unable to load Mediawire media due to invalid URL.</div>"
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a&amp;b"), "a&b");
        assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
        assert_eq!(decode_entities("&quot;x&#039;"), "\"x'");
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }
}
