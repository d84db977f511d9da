//! Launch orchestration: validation, parameter assembly, signing, form.
//!
//! All inputs arrive as explicit values; nothing is read from ambient state
//! mid-computation. The host application resolves its user, its base URL,
//! and the target URL up front and passes them in.

use mw_asset::AssetUrl;
use mw_config::ProviderConfig;
use tracing::debug;

use crate::form::launch_form;
use crate::params::{LtiLaunchConfig, build_launch_params};
use crate::sign::sign;

/// Identity and authorization of the host user requesting a launch.
///
/// The username feeds every LTI name slot; the launch never transmits a
/// separate display name, and the family name is the fixed host marker.
#[derive(Debug, Clone, Default)]
pub struct HostUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub authenticated: bool,
    /// Whether the user holds the launch permission in the host.
    pub can_launch: bool,
}

/// Per-request launch inputs resolved by the host application.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// Mediawire asset URL to launch, already query-decoded.
    pub target_url: String,
    /// Path of the host page containing the embed, leading slash included.
    pub page_path: String,
    /// `scheme://host` of the host application, no trailing slash.
    pub host_base_url: String,
    /// Host site name, used when no institution name is configured.
    pub site_name: String,
    /// Current interface language, e.g. `en`.
    pub locale: String,
    /// Host application version string.
    pub host_version: String,
}

/// Launch refusals. Each variant renders as its generic end-user message;
/// configuration internals never leak into them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("Mediawire site URL is not properly configured.")]
    SiteNotConfigured,
    #[error("Unable to load Mediawire media due to invalid URL.")]
    InvalidTargetUrl,
    #[error("URL host does not match configured Mediawire host.")]
    HostMismatch,
    #[error("User must be authenticated to use Mediawire LTI launch.")]
    NotAuthenticated,
    #[error("User must have \"launch Mediawire content\" permission to use Mediawire LTI launch.")]
    NotAuthorized,
}

/// Validates a launch request and renders the signed self-submitting form.
///
/// Checks run in a fixed order and the first failure wins: configured site,
/// target URL, host equality, authentication, permission. Nothing is signed
/// until every check has passed.
pub fn build_launch_page(
    provider: &ProviderConfig,
    user: &HostUser,
    request: &LaunchRequest,
) -> Result<String, LaunchError> {
    let site = AssetUrl::parse(&provider.site_url);
    let Some(endpoint) = site.lti_endpoint_url() else {
        return Err(LaunchError::SiteNotConfigured);
    };

    let target = AssetUrl::parse(&request.target_url);
    if !target.is_valid_asset_url() {
        return Err(LaunchError::InvalidTargetUrl);
    }
    if target.host() != site.host() {
        return Err(LaunchError::HostMismatch);
    }

    if !user.authenticated {
        return Err(LaunchError::NotAuthenticated);
    }
    if !user.can_launch {
        return Err(LaunchError::NotAuthorized);
    }

    let institution_name = provider
        .institution_name
        .clone()
        .unwrap_or_else(|| format!("Drupal site: {}", request.site_name));
    let page_url = format!("{}{}", request.host_base_url, request.page_path);

    let config = LtiLaunchConfig {
        lti_key: provider.lti_key.clone(),
        lti_secret: provider.lti_secret.clone(),
        group_name: provider.group_name.clone(),
        user_id: user.id.clone(),
        user_name: user.username.clone(),
        user_display_name: user.username.clone(),
        user_first_name: user.username.clone(),
        user_last_name: "Drupal".to_owned(),
        user_email: user.email.clone(),
        host_version: request.host_version.clone(),
        host_locale: request.locale.clone(),
        institution_name,
        page_url,
        resource_link_id: request.target_url.clone(),
        return_context: request.target_url.clone(),
    };

    let mut params = build_launch_params(&config);
    let signature = sign("POST", endpoint, &params, &config.lti_secret);
    params.insert("oauth_signature".to_owned(), signature);
    debug!("signed LTI launch form for {endpoint}");

    Ok(launch_form(endpoint, &params))
}
