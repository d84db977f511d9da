//! CLI error types.

use mw_client::ClientError;
use mw_config::ConfigError;
use mw_lti::LaunchError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Launch(#[from] LaunchError),

    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Validation(String),
}
