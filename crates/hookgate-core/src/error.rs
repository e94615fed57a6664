//! Error types for the Hookgate core.

use std::path::PathBuf;

/// Core error type for Hookgate configuration and secret loading.
#[derive(Debug, thiserror::Error)]
pub enum HookgateError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The secrets file could not be read.
    #[error("failed to read secrets file {}", path.display())]
    SecretsFile {
        /// Path that was configured.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// No signing secrets were configured, or all of them were blank.
    #[error("no webhook signing secrets configured")]
    NoSecrets,
}

/// Convenience result type for Hookgate operations.
pub type HookgateResult<T> = Result<T, HookgateError>;
