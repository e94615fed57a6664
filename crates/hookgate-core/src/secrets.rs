//! Loading webhook signing secrets from configuration.
//!
//! Secrets come either from a file (one per line, or comma-separated) or from the
//! raw `WEBHOOK_AUTH_TOKENS` value. Order is preserved: the first secret is the
//! one verification tries first.

use tracing::debug;

use crate::config::GatewayConfig;
use crate::error::{HookgateError, HookgateResult};

/// Split a delimited secrets value into individual secrets.
///
/// Commas and newlines both separate entries. Surrounding whitespace is trimmed
/// and blank entries are dropped.
///
/// # Examples
///
/// ```
/// use hookgate_core::split_secrets;
///
/// assert_eq!(split_secrets(" new , old,,"), vec!["new", "old"]);
/// assert_eq!(split_secrets("a\nb\r\nc"), vec!["a", "b", "c"]);
/// ```
#[must_use]
pub fn split_secrets(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Load the configured signing secrets.
///
/// The secrets file wins over the inline value when both are set. The file is
/// read on every call, so calling this again picks up a rotated file.
///
/// # Errors
///
/// Returns [`HookgateError::SecretsFile`] if the file cannot be read, or
/// [`HookgateError::NoSecrets`] if no non-blank secret is configured.
pub fn load_secrets(config: &GatewayConfig) -> HookgateResult<Vec<String>> {
    let secrets = if let Some(path) = &config.auth_tokens_file {
        let raw = std::fs::read_to_string(path).map_err(|source| HookgateError::SecretsFile {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "read webhook secrets file");
        split_secrets(&raw)
    } else {
        config
            .auth_tokens
            .as_deref()
            .map(split_secrets)
            .unwrap_or_default()
    };

    if secrets.is_empty() {
        return Err(HookgateError::NoSecrets);
    }

    debug!(count = secrets.len(), "loaded webhook signing secrets");
    Ok(secrets)
}
