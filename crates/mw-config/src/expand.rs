//! `${VAR}` expansion for configuration values.
//!
//! Secret-bearing provider fields accept `${VAR}` and `${VAR:-default}`
//! references so credentials can stay out of `mw.toml`. Plain `$VAR` is
//! left alone; only the braced form expands.

use std::env::VarError;

use crate::ConfigError;

/// Expands `${VAR}` references in a config value.
///
/// A reference without a default errors when the variable is unset; the
/// error names `field` so the report points at the offending config key.
/// Values without `${` pass through untouched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map_err(|err| ConfigError::EnvVar {
            field: field.to_owned(),
            message: match err.cause {
                VarError::NotPresent => format!("${{{}}} not set", err.var_name),
                VarError::NotUnicode(_) => format!("${{{}}} not valid unicode", err.var_name),
            },
        })?;
    Ok(expanded.into_owned())
}
