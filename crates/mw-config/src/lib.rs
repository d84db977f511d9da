//! Configuration management for MW.
//!
//! Parses `mw.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `provider.site_url`
//! - `provider.lti_key`
//! - `provider.lti_secret`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Mediawire site URL.
    pub site_url: Option<String>,
    /// Override LTI consumer key.
    pub lti_key: Option<String>,
    /// Override LTI consumer secret.
    pub lti_secret: Option<String>,
    /// Override provider group name.
    pub group_name: Option<String>,
    /// Override default embed width.
    pub width: Option<u32>,
    /// Override default embed height.
    pub height: Option<u32>,
    /// Override thumbnail cache directory.
    pub thumbnail_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mw.toml";

/// Smallest embed dimension the player renders usefully.
const MIN_DIMENSION: u32 = 100;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mediawire provider configuration (optional section).
    pub provider: Option<ProviderConfig>,
    /// Embed defaults.
    pub embed: EmbedConfig,
    /// Thumbnail cache configuration (paths are relative strings from TOML).
    thumbnails: ThumbnailsConfigRaw,

    /// Resolved thumbnail configuration (set after loading).
    #[serde(skip)]
    pub thumbnails_resolved: ThumbnailsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Mediawire provider configuration.
#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Mediawire site URL, e.g. `https://support.example.com`.
    pub site_url: String,
    /// OAuth consumer key issued by Mediawire.
    pub lti_key: String,
    /// OAuth consumer secret issued by Mediawire.
    pub lti_secret: String,
    /// Provider-side group launched users are placed in.
    #[serde(default)]
    pub group_name: String,
    /// Institution name sent with launches. When unset, launches fall back
    /// to a name derived from the host site name.
    pub institution_name: Option<String>,
    /// Host-side route that serves the LTI launch page.
    #[serde(default = "default_launch_path")]
    pub launch_path: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            lti_key: String::new(),
            lti_secret: String::new(),
            group_name: String::new(),
            institution_name: None,
            launch_path: default_launch_path(),
        }
    }
}

impl ProviderConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site_url, "provider.site_url")?;
        require_http_url(&self.site_url, "provider.site_url")?;
        require_non_empty(&self.lti_key, "provider.lti_key")?;
        require_non_empty(&self.lti_secret, "provider.lti_secret")?;
        require_non_empty(&self.group_name, "provider.group_name")?;
        if !self.launch_path.starts_with('/') {
            return Err(ConfigError::Validation(
                "provider.launch_path must start with /".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_launch_path() -> String {
    "/mediawire/external_content".to_owned()
}

/// Embed defaults applied when an asset URL carries no override.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    /// Show the share button in embedded players.
    pub show_share: bool,
    /// Show the media title in embedded players.
    pub show_title: bool,
    /// Start playback automatically.
    pub autoplay: bool,
    /// Turn captions on by default.
    pub show_captions: bool,
    /// Default iframe width in pixels.
    pub default_width: u32,
    /// Default iframe height in pixels.
    pub default_height: u32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            show_share: false,
            show_title: false,
            autoplay: false,
            show_captions: false,
            default_width: 480,
            default_height: 360,
        }
    }
}

/// Raw thumbnail configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ThumbnailsConfigRaw {
    directory: Option<String>,
    enabled: Option<bool>,
}

/// Resolved thumbnail cache configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ThumbnailsConfig {
    /// Directory thumbnail files are cached in.
    pub directory: PathBuf,
    /// Whether thumbnail caching is enabled.
    pub enabled: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`provider.lti_secret`").
        field: String,
        /// Error message (e.g., "${`MW_LTI_SECRET`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mw.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    ///
    /// Provider overrides create the `[provider]` section when the file did
    /// not carry one, so a fully flag-driven invocation works without any
    /// config file.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(site_url) = &settings.site_url {
            self.provider_mut().site_url.clone_from(site_url);
        }
        if let Some(lti_key) = &settings.lti_key {
            self.provider_mut().lti_key.clone_from(lti_key);
        }
        if let Some(lti_secret) = &settings.lti_secret {
            self.provider_mut().lti_secret.clone_from(lti_secret);
        }
        if let Some(group_name) = &settings.group_name {
            self.provider_mut().group_name.clone_from(group_name);
        }
        if let Some(width) = settings.width {
            self.embed.default_width = width;
        }
        if let Some(height) = settings.height {
            self.embed.default_height = height;
        }
        if let Some(thumbnail_dir) = &settings.thumbnail_dir {
            self.thumbnails_resolved.directory.clone_from(thumbnail_dir);
        }
    }

    fn provider_mut(&mut self) -> &mut ProviderConfig {
        self.provider.get_or_insert_with(ProviderConfig::default)
    }

    /// Get validated provider configuration.
    ///
    /// Returns the provider config if the `[provider]` section is present
    /// and all fields are valid. Use this instead of accessing the `provider`
    /// field directly when the command requires the Mediawire connection.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_provider(&self) -> Result<&ProviderConfig, ConfigError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            ConfigError::Validation("[provider] section required in config".into())
        })?;
        provider.validate()?;
        Ok(provider)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            provider: None,
            embed: EmbedConfig::default(),
            thumbnails: ThumbnailsConfigRaw::default(),
            thumbnails_resolved: ThumbnailsConfig {
                directory: base.join(".mw").join("thumbnails"),
                enabled: true,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // ${VAR} references may appear in path values, so expand first
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks embed dimensions and, when the `[provider]` section is present,
    /// the provider fields. Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_embed()?;
        if let Some(provider) = &self.provider {
            provider.validate()?;
        }
        Ok(())
    }

    /// Validate embed default dimensions.
    fn validate_embed(&self) -> Result<(), ConfigError> {
        if self.embed.default_width < MIN_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "embed.default_width must be at least {MIN_DIMENSION}"
            )));
        }
        if self.embed.default_height < MIN_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "embed.default_height must be at least {MIN_DIMENSION}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut provider) = self.provider {
            provider.site_url = expand::expand_env(&provider.site_url, "provider.site_url")?;
            provider.lti_key = expand::expand_env(&provider.lti_key, "provider.lti_key")?;
            provider.lti_secret = expand::expand_env(&provider.lti_secret, "provider.lti_secret")?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let directory = match self.thumbnails.directory.as_deref() {
            Some(dir) => config_dir.join(dir),
            None => config_dir.join(".mw").join("thumbnails"),
        };
        self.thumbnails_resolved = ThumbnailsConfig {
            directory,
            enabled: self.thumbnails.enabled.unwrap_or(true),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.provider.is_none());
        assert!(!config.embed.show_share);
        assert!(!config.embed.show_title);
        assert!(!config.embed.autoplay);
        assert!(!config.embed.show_captions);
        assert_eq!(config.embed.default_width, 480);
        assert_eq!(config.embed.default_height, 360);
        assert_eq!(
            config.thumbnails_resolved.directory,
            PathBuf::from("/test/.mw/thumbnails")
        );
        assert!(config.thumbnails_resolved.enabled);
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.provider.is_none());
        assert_eq!(config.embed.default_width, 480);
        assert_eq!(config.embed.default_height, 360);
    }

    #[test]
    fn test_parse_provider_config() {
        let toml = r#"
[provider]
site_url = "https://support.example.com"
lti_key = "my-dummy-key"
lti_secret = "my-dummy-secret"
group_name = "my-dummy-group"
institution_name = "My Great Institution"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let provider = config.provider.unwrap();
        assert_eq!(provider.site_url, "https://support.example.com");
        assert_eq!(provider.lti_key, "my-dummy-key");
        assert_eq!(provider.lti_secret, "my-dummy-secret");
        assert_eq!(provider.group_name, "my-dummy-group");
        assert_eq!(
            provider.institution_name,
            Some("My Great Institution".to_owned())
        );
        assert_eq!(provider.launch_path, "/mediawire/external_content");
    }

    #[test]
    fn test_parse_provider_optional_fields_absent() {
        let toml = r#"
[provider]
site_url = "https://support.example.com"
lti_key = "key"
lti_secret = "secret"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let provider = config.provider.unwrap();
        assert_eq!(provider.group_name, "");
        assert!(provider.institution_name.is_none());
        assert_eq!(provider.launch_path, "/mediawire/external_content");
    }

    #[test]
    fn test_parse_embed_config() {
        let toml = r#"
[embed]
show_share = true
show_title = true
autoplay = true
show_captions = true
default_width = 640
default_height = 480
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.embed.show_share);
        assert!(config.embed.show_title);
        assert!(config.embed.autoplay);
        assert!(config.embed.show_captions);
        assert_eq!(config.embed.default_width, 640);
        assert_eq!(config.embed.default_height, 480);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[thumbnails]
directory = "cache/thumbs"
enabled = false
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.thumbnails_resolved.directory,
            PathBuf::from("/project/cache/thumbs")
        );
        assert!(!config.thumbnails_resolved.enabled);
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let toml = "";
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.thumbnails_resolved.directory,
            PathBuf::from("/project/.mw/thumbnails")
        );
        assert!(config.thumbnails_resolved.enabled);
    }

    #[test]
    fn test_apply_cli_settings_creates_provider_section() {
        let mut config = Config::default_with_base(Path::new("/test"));
        assert!(config.provider.is_none());

        let overrides = CliSettings {
            site_url: Some("https://support.example.com".to_owned()),
            lti_key: Some("key".to_owned()),
            lti_secret: Some("secret".to_owned()),
            group_name: Some("group".to_owned()),
            ..Default::default()
        };
        config.apply_cli_settings(&overrides);

        let provider = config.provider.unwrap();
        assert_eq!(provider.site_url, "https://support.example.com");
        assert_eq!(provider.lti_key, "key");
        assert_eq!(provider.lti_secret, "secret");
        assert_eq!(provider.group_name, "group");
        assert_eq!(provider.launch_path, "/mediawire/external_content");
    }

    #[test]
    fn test_apply_cli_settings_overrides_provider() {
        let toml = r#"
[provider]
site_url = "https://old.example.com"
lti_key = "old-key"
lti_secret = "old-secret"
group_name = "old-group"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let overrides = CliSettings {
            site_url: Some("https://new.example.com".to_owned()),
            ..Default::default()
        };
        config.apply_cli_settings(&overrides);

        let provider = config.provider.unwrap();
        assert_eq!(provider.site_url, "https://new.example.com");
        assert_eq!(provider.lti_key, "old-key"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_dimensions() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            width: Some(800),
            height: Some(450),
            ..Default::default()
        };
        config.apply_cli_settings(&overrides);

        assert_eq!(config.embed.default_width, 800);
        assert_eq!(config.embed.default_height, 450);
    }

    #[test]
    fn test_apply_cli_settings_thumbnail_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            thumbnail_dir: Some(PathBuf::from("/custom/thumbs")),
            ..Default::default()
        };
        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.thumbnails_resolved.directory,
            PathBuf::from("/custom/thumbs")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert!(config.provider.is_none());
        assert_eq!(config.embed.default_width, 480);
    }

    #[test]
    fn test_expand_env_vars_provider() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MW_TEST_SITE", "https://support.example.com");
            std::env::set_var("MW_TEST_KEY", "my-key");
            std::env::set_var("MW_TEST_SECRET", "my-secret");
        }

        let toml = r#"
[provider]
site_url = "${MW_TEST_SITE}"
lti_key = "${MW_TEST_KEY}"
lti_secret = "${MW_TEST_SECRET}"
group_name = "plain"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        let provider = config.provider.unwrap();
        assert_eq!(provider.site_url, "https://support.example.com");
        assert_eq!(provider.lti_key, "my-key");
        assert_eq!(provider.lti_secret, "my-secret");
        assert_eq!(provider.group_name, "plain");

        unsafe {
            std::env::remove_var("MW_TEST_SITE");
            std::env::remove_var("MW_TEST_KEY");
            std::env::remove_var("MW_TEST_SECRET");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MW_MISSING_CONFIG_VAR");
        }

        let toml = r#"
[provider]
site_url = "https://support.example.com"
lti_key = "key"
lti_secret = "${MW_MISSING_CONFIG_VAR}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let result = config.expand_env_vars();

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MW_MISSING_CONFIG_VAR"));
        assert!(err.to_string().contains("provider.lti_secret"));
    }

    #[test]
    fn test_expand_env_vars_literal_unchanged() {
        let toml = r#"
[provider]
site_url = "https://support.example.com"
lti_key = "key"
lti_secret = "secret"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.provider.unwrap().lti_secret, "secret");
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(result: Result<(), ConfigError>, expected_substrings: &[&str]) {
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    /// Create a valid provider config for testing.
    fn valid_provider_config() -> ProviderConfig {
        ProviderConfig {
            site_url: "https://support.example.com".to_owned(),
            lti_key: "key".to_owned(),
            lti_secret: "secret".to_owned(),
            group_name: "group".to_owned(),
            institution_name: None,
            launch_path: default_launch_path(),
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_embed_width_below_minimum() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.embed.default_width = 99;
        assert_validation_error(config.validate(), &["default_width", "100"]);
    }

    #[test]
    fn test_validate_embed_height_below_minimum() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.embed.default_height = 0;
        assert_validation_error(config.validate(), &["default_height", "100"]);
    }

    #[test]
    fn test_provider_config_validate_valid() {
        assert!(valid_provider_config().validate().is_ok());
    }

    #[test]
    fn test_provider_config_validate_empty_key() {
        let provider = ProviderConfig {
            lti_key: String::new(),
            ..valid_provider_config()
        };
        assert_validation_error(provider.validate(), &["lti_key", "empty"]);
    }

    #[test]
    fn test_provider_config_validate_empty_secret() {
        let provider = ProviderConfig {
            lti_secret: String::new(),
            ..valid_provider_config()
        };
        assert_validation_error(provider.validate(), &["lti_secret", "empty"]);
    }

    #[test]
    fn test_provider_config_validate_empty_group() {
        let provider = ProviderConfig {
            group_name: String::new(),
            ..valid_provider_config()
        };
        assert_validation_error(provider.validate(), &["group_name", "empty"]);
    }

    #[test]
    fn test_provider_config_validate_invalid_url() {
        let provider = ProviderConfig {
            site_url: "not-a-url".to_owned(),
            ..valid_provider_config()
        };
        assert_validation_error(provider.validate(), &["site_url", "http"]);
    }

    #[test]
    fn test_provider_config_validate_launch_path() {
        let provider = ProviderConfig {
            launch_path: "mediawire/external_content".to_owned(),
            ..valid_provider_config()
        };
        assert_validation_error(provider.validate(), &["launch_path", "/"]);
    }

    #[test]
    fn test_config_require_provider_returns_validated() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.provider = Some(valid_provider_config());
        assert!(config.require_provider().is_ok());
    }

    #[test]
    fn test_config_require_provider_missing_section() {
        let config = Config::default_with_base(Path::new("/test"));
        let err = config.require_provider().unwrap_err();
        assert!(err.to_string().contains("[provider]"));
    }

    #[test]
    fn test_config_require_provider_invalid_section() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.provider = Some(ProviderConfig {
            site_url: String::new(),
            ..valid_provider_config()
        });
        assert!(config.require_provider().is_err());
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/definitely/missing/mw.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
