//! LTI 1.0 launch parameter assembly.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};
use rand::RngExt;

/// Seconds added to the current time when stamping `oauth_timestamp`.
///
/// Launches are deliberately future-dated by half an hour; the provider
/// accepts such stamps and deployed verifiers expect the offset.
const TIMESTAMP_OFFSET_SECS: u64 = 30 * 60;

/// Inputs for one LTI launch.
///
/// All fields are plain strings; an absent value is the empty string, which
/// flows into the parameter set as-is. Construct per request and discard.
#[derive(Debug, Clone, Default)]
pub struct LtiLaunchConfig {
    /// OAuth consumer key issued by the provider.
    pub lti_key: String,
    /// OAuth consumer secret issued by the provider.
    pub lti_secret: String,
    /// Provider-side group to place launched users in.
    pub group_name: String,
    pub user_id: String,
    pub user_name: String,
    pub user_display_name: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
    /// Version of the host application, e.g. `11.2.0`.
    pub host_version: String,
    /// Current interface language of the host, e.g. `en`.
    pub host_locale: String,
    pub institution_name: String,
    /// Absolute URL of the host page containing the embed.
    pub page_url: String,
    /// Stable launch identifier input, hashed into `resource_link_id`.
    pub resource_link_id: String,
    /// Opaque context string echoed back by the provider.
    pub return_context: String,
}

/// Builds the launch parameter set for `config`.
///
/// The mapping is fixed: every launch carries the same parameter names, and
/// only `oauth_nonce` and `oauth_timestamp` differ between two builds from
/// identical input. `oauth_signature` is not part of the set; callers inject
/// it after signing.
#[must_use]
pub fn build_launch_params(config: &LtiLaunchConfig) -> BTreeMap<String, String> {
    let group = if config.group_name.is_empty() {
        "Drupal"
    } else {
        config.group_name.as_str()
    };

    let params = [
        ("oauth_version", "1.0".to_owned()),
        ("oauth_nonce", generate_nonce()),
        ("oauth_timestamp", generate_timestamp()),
        ("oauth_consumer_key", config.lti_key.clone()),
        ("oauth_callback", "about:blank".to_owned()),
        ("oauth_signature_method", "HMAC-SHA256".to_owned()),
        ("user_id", config.user_id.clone()),
        ("lis_person_sourcedid", config.user_id.clone()),
        ("roles", String::new()),
        ("lis_person_name_given", config.user_first_name.clone()),
        ("lis_person_name_family", config.user_last_name.clone()),
        ("lis_person_name_full", config.user_display_name.clone()),
        (
            "lis_person_contact_email_primary",
            config.user_email.clone(),
        ),
        ("ext_user_username", config.user_name.clone()),
        ("ext_lms", "drupal".to_owned()),
        (
            "tool_consumer_info_product_family_code",
            "drupal".to_owned(),
        ),
        ("tool_consumer_info_version", config.host_version.clone()),
        (
            "tool_consumer_instance_name",
            config.institution_name.clone(),
        ),
        ("lti_version", "LTI-1p0".to_owned()),
        ("lti_message_type", "basic-lti-launch-request".to_owned()),
        ("launch_presentation_locale", config.host_locale.clone()),
        ("launch_presentation_document_target", "iframe".to_owned()),
        ("launch_presentation_return_url", config.page_url.clone()),
        ("returnContext", config.return_context.clone()),
        ("context_id", context_slug(group)),
        ("context_label", group.to_owned()),
        ("context_title", group.to_owned()),
        ("resource_link_id", md5_hex(&config.resource_link_id)),
        ("resource_link_title", "Mediawire".to_owned()),
        ("custom_section_id", config.page_url.clone()),
        ("custom_module_id", String::new()),
    ];

    params
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// Lowercases the group name and replaces every non-alphanumeric character
/// with `-`, yielding a provider-safe group identifier.
fn context_slug(group: &str) -> String {
    group
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn md5_hex(input: &str) -> String {
    let hash = Md5::digest(input.as_bytes());
    hex::encode(hash)
}

/// Best-effort unique nonce: md5 hex of a random 31-bit integer rendered as
/// decimal. Replay rejection is the provider's job; the timestamp bounds the
/// window a collision would matter in.
fn generate_nonce() -> String {
    let n: u32 = rand::rng().random_range(0..(1_u32 << 31));
    md5_hex(&n.to_string())
}

fn generate_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    (now + TIMESTAMP_OFFSET_SECS).to_string()
}
