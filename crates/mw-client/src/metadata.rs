//! Metadata fields derivable from a media source value.
//!
//! A host stores a Mediawire asset URL as the source value of a media item
//! and derives display metadata from it when the item is created or edited.
//! Each derivable attribute is a [`MetadataField`]; resolution reads the
//! parsed URL first and falls back to oEmbed metadata where the URL cannot
//! answer.

use mw_asset::AssetUrl;

use crate::OembedMetadata;

/// A metadata attribute derivable from an asset URL and its oEmbed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    /// The stored source URL itself.
    FullUrl,
    /// Asset shortcode.
    Shortcode,
    /// Media title (oEmbed).
    Title,
    /// Thumbnail image URL (oEmbed).
    ThumbnailUrl,
    /// Player width; URL override wins over the oEmbed value.
    Width,
    /// Player height; URL override wins over the oEmbed value.
    Height,
    /// Playback start position (`start` query param).
    StartAt,
    /// Playback stop position (`end` query param).
    StopAt,
    /// Autoplay flag (`autoplay` query param).
    Autoplay,
    /// Whether player controls are hidden (`controls` query param, inverted).
    HideControls,
    /// Audio-only playback flag (`audio_only` query param).
    AudioOnly,
    /// Whether seeking past watched content is blocked
    /// (`seek_mode=watched_only`).
    PreventSkippingAhead,
    /// Interactive transcript / captions policy (`cc_load_policy` query param).
    InteractiveTranscript,
}

impl MetadataField {
    /// Every derivable field, in display order.
    pub const ALL: [Self; 13] = [
        Self::FullUrl,
        Self::Shortcode,
        Self::Title,
        Self::ThumbnailUrl,
        Self::Width,
        Self::Height,
        Self::StartAt,
        Self::StopAt,
        Self::Autoplay,
        Self::HideControls,
        Self::AudioOnly,
        Self::PreventSkippingAhead,
        Self::InteractiveTranscript,
    ];

    /// Parse a field from its attribute name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full_url" => Some(Self::FullUrl),
            "shortcode" => Some(Self::Shortcode),
            "title" => Some(Self::Title),
            "thumbnail_url" => Some(Self::ThumbnailUrl),
            "width" => Some(Self::Width),
            "height" => Some(Self::Height),
            "start_at" => Some(Self::StartAt),
            "stop_at" => Some(Self::StopAt),
            "autoplay" => Some(Self::Autoplay),
            "hide_controls" => Some(Self::HideControls),
            "audio_only" => Some(Self::AudioOnly),
            "prevent_skipping_ahead" => Some(Self::PreventSkippingAhead),
            "interactive_transcript" => Some(Self::InteractiveTranscript),
            _ => None,
        }
    }

    /// Attribute name for this field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullUrl => "full_url",
            Self::Shortcode => "shortcode",
            Self::Title => "title",
            Self::ThumbnailUrl => "thumbnail_url",
            Self::Width => "width",
            Self::Height => "height",
            Self::StartAt => "start_at",
            Self::StopAt => "stop_at",
            Self::Autoplay => "autoplay",
            Self::HideControls => "hide_controls",
            Self::AudioOnly => "audio_only",
            Self::PreventSkippingAhead => "prevent_skipping_ahead",
            Self::InteractiveTranscript => "interactive_transcript",
        }
    }

    /// Resolve this field for a parsed asset URL.
    ///
    /// Returns `None` when the URL is not a valid asset URL, when the field's
    /// query parameter is absent, or when the oEmbed record (if any) does not
    /// carry the value. Positional and flag fields report the query parameter
    /// value as stored; the two derived flags (`HideControls`,
    /// `PreventSkippingAhead`) report `"true"`/`"false"`.
    #[must_use]
    pub fn resolve(self, asset: &AssetUrl, oembed: Option<&OembedMetadata>) -> Option<String> {
        if !asset.is_valid_asset_url() {
            return None;
        }
        let params = asset.query_params();

        match self {
            Self::FullUrl => Some(asset.url().to_owned()),
            Self::Shortcode => asset.shortcode().map(str::to_owned),
            Self::Title => oembed.and_then(|m| m.title.clone()),
            Self::ThumbnailUrl => oembed.and_then(|m| m.thumbnail_url.clone()),
            Self::Width => asset
                .width()
                .or_else(|| oembed.and_then(|m| m.width))
                .map(|w| w.to_string()),
            Self::Height => asset
                .height()
                .or_else(|| oembed.and_then(|m| m.height))
                .map(|h| h.to_string()),
            Self::StartAt => params.get("start").cloned(),
            Self::StopAt => params.get("end").cloned(),
            Self::Autoplay => params.get("autoplay").cloned(),
            Self::HideControls => params.get("controls").map(|v| bool_str(!truthy(v))),
            Self::AudioOnly => params.get("audio_only").cloned(),
            Self::PreventSkippingAhead => params
                .get("seek_mode")
                .map(|v| bool_str(v == "watched_only")),
            Self::InteractiveTranscript => params.get("cc_load_policy").cloned(),
        }
    }
}

/// Query parameter flags use `false`/`0` for off; anything else is on.
fn truthy(value: &str) -> bool {
    !matches!(value, "false" | "0" | "")
}

fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn asset() -> AssetUrl {
        AssetUrl::parse(
            "https://support.example.com/w/CwAAAA/\
             ?start=17&end=29&autoplay=true&controls=false&audio_only=1\
             &seek_mode=watched_only&cc_load_policy=1",
        )
    }

    fn oembed() -> OembedMetadata {
        OembedMetadata {
            title: Some("Cool Video".to_owned()),
            thumbnail_url: Some("https://support.example.com/thumbnails/CwAAAA.jpg".to_owned()),
            width: Some(640),
            height: Some(360),
            ..OembedMetadata::default()
        }
    }

    #[test]
    fn test_parse_and_as_str_round_trip() {
        for field in MetadataField::ALL {
            assert_eq!(MetadataField::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn test_parse_unknown_field() {
        assert_eq!(MetadataField::parse("warpdrive"), None);
        assert_eq!(MetadataField::parse(""), None);
    }

    #[test]
    fn test_resolve_url_fields() {
        let asset = asset();

        assert_eq!(
            MetadataField::FullUrl.resolve(&asset, None),
            Some(asset.url().to_owned())
        );
        assert_eq!(
            MetadataField::Shortcode.resolve(&asset, None),
            Some("CwAAAA".to_owned())
        );
    }

    #[test]
    fn test_resolve_positional_fields() {
        let asset = asset();

        assert_eq!(
            MetadataField::StartAt.resolve(&asset, None),
            Some("17".to_owned())
        );
        assert_eq!(
            MetadataField::StopAt.resolve(&asset, None),
            Some("29".to_owned())
        );
    }

    #[test]
    fn test_resolve_flag_fields() {
        let asset = asset();

        assert_eq!(
            MetadataField::Autoplay.resolve(&asset, None),
            Some("true".to_owned())
        );
        assert_eq!(
            MetadataField::AudioOnly.resolve(&asset, None),
            Some("1".to_owned())
        );
        assert_eq!(
            MetadataField::InteractiveTranscript.resolve(&asset, None),
            Some("1".to_owned())
        );
    }

    #[test]
    fn test_resolve_hide_controls_inverts_controls_param() {
        let hidden = AssetUrl::parse("https://support.example.com/w/CwAAAA/?controls=false");
        let shown = AssetUrl::parse("https://support.example.com/w/CwAAAA/?controls=true");
        let unspecified = AssetUrl::parse("https://support.example.com/w/CwAAAA/");

        assert_eq!(
            MetadataField::HideControls.resolve(&hidden, None),
            Some("true".to_owned())
        );
        assert_eq!(
            MetadataField::HideControls.resolve(&shown, None),
            Some("false".to_owned())
        );
        assert_eq!(MetadataField::HideControls.resolve(&unspecified, None), None);
    }

    #[test]
    fn test_resolve_prevent_skipping_ahead() {
        let watched = asset();
        let normal = AssetUrl::parse("https://support.example.com/w/CwAAAA/?seek_mode=default");

        assert_eq!(
            MetadataField::PreventSkippingAhead.resolve(&watched, None),
            Some("true".to_owned())
        );
        assert_eq!(
            MetadataField::PreventSkippingAhead.resolve(&normal, None),
            Some("false".to_owned())
        );
    }

    #[test]
    fn test_resolve_oembed_fields() {
        let asset = AssetUrl::parse("https://support.example.com/w/CwAAAA/");
        let oembed = oembed();

        assert_eq!(
            MetadataField::Title.resolve(&asset, Some(&oembed)),
            Some("Cool Video".to_owned())
        );
        assert_eq!(
            MetadataField::ThumbnailUrl.resolve(&asset, Some(&oembed)),
            Some("https://support.example.com/thumbnails/CwAAAA.jpg".to_owned())
        );
        assert_eq!(
            MetadataField::Width.resolve(&asset, Some(&oembed)),
            Some("640".to_owned())
        );
        assert_eq!(MetadataField::Title.resolve(&asset, None), None);
    }

    #[test]
    fn test_resolve_width_url_override_wins() {
        let asset = AssetUrl::parse("https://support.example.com/w/CwAAAA/?width=800&height=450");

        assert_eq!(
            MetadataField::Width.resolve(&asset, Some(&oembed())),
            Some("800".to_owned())
        );
        assert_eq!(
            MetadataField::Height.resolve(&asset, Some(&oembed())),
            Some("450".to_owned())
        );
    }

    #[test]
    fn test_resolve_invalid_asset_yields_nothing() {
        let invalid = AssetUrl::parse("https://support.example.com/about/");

        for field in MetadataField::ALL {
            assert_eq!(field.resolve(&invalid, Some(&oembed())), None);
        }
    }
}
