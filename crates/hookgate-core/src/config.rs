//! Gateway configuration.
//!
//! Provides [`GatewayConfig`], loaded from environment variables. Signing secrets
//! are held here only as their raw configured value; they are skipped by serde
//! and redacted from `Debug` output.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

use crate::types::DuplicateParamPolicy;

/// Hookgate gateway configuration.
///
/// # Examples
///
/// ```
/// use hookgate_core::{DuplicateParamPolicy, GatewayConfig};
///
/// let config = GatewayConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8080");
/// assert_eq!(config.duplicate_params, DuplicateParamPolicy::Reject);
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Bind address for the gateway (e.g. `"0.0.0.0:8080"`).
    #[builder(default = String::from("0.0.0.0:8080"))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Raw comma-separated signing secrets, in priority order.
    #[serde(skip)]
    #[builder(default, setter(strip_option))]
    pub auth_tokens: Option<String>,

    /// File holding the signing secrets. Takes precedence over `auth_tokens`
    /// and is re-read on reload.
    #[builder(default, setter(strip_option))]
    pub auth_tokens_file: Option<PathBuf>,

    /// Name of the request header carrying the signature.
    #[builder(default = String::from("X-Twilio-Signature"))]
    pub signature_header: String,

    /// Externally visible base URL (scheme and host) used to rebuild the signed
    /// URL when the gateway sits behind a proxy.
    #[builder(default, setter(strip_option))]
    pub public_url: Option<String>,

    /// Policy for repeated form parameter names.
    #[builder(default)]
    pub duplicate_params: DuplicateParamPolicy,

    /// Maximum accepted request body size in bytes.
    #[builder(default = 1_048_576)]
    pub max_body_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:8080"),
            log_level: String::from("info"),
            auth_tokens: None,
            auth_tokens_file: None,
            signature_header: String::from("X-Twilio-Signature"),
            public_url: None,
            duplicate_params: DuplicateParamPolicy::Reject,
            max_body_bytes: 1_048_576,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth_tokens = self.auth_tokens.as_ref().map(|_| "<redacted>");
        f.debug_struct("GatewayConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("log_level", &self.log_level)
            .field("auth_tokens", &auth_tokens)
            .field("auth_tokens_file", &self.auth_tokens_file)
            .field("signature_header", &self.signature_header)
            .field("public_url", &self.public_url)
            .field("duplicate_params", &self.duplicate_params)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8080` |
    /// | `LOG_LEVEL` | `info` |
    /// | `WEBHOOK_AUTH_TOKENS` | *(unset)* |
    /// | `WEBHOOK_AUTH_TOKENS_FILE` | *(unset)* |
    /// | `WEBHOOK_SIGNATURE_HEADER` | `X-Twilio-Signature` |
    /// | `WEBHOOK_PUBLIC_URL` | *(unset)* |
    /// | `WEBHOOK_DUPLICATE_PARAMS` | `reject` |
    /// | `WEBHOOK_MAX_BODY_BYTES` | `1048576` |
    ///
    /// Unparseable values are logged and the default is kept.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("WEBHOOK_AUTH_TOKENS") {
            config.auth_tokens = Some(v);
        }
        if let Some(v) = lookup("WEBHOOK_AUTH_TOKENS_FILE").filter(|v| !v.is_empty()) {
            config.auth_tokens_file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("WEBHOOK_SIGNATURE_HEADER").filter(|v| !v.is_empty()) {
            config.signature_header = v;
        }
        if let Some(v) = lookup("WEBHOOK_PUBLIC_URL").filter(|v| !v.is_empty()) {
            config.public_url = Some(v);
        }
        if let Some(v) = lookup("WEBHOOK_DUPLICATE_PARAMS") {
            match v.parse() {
                Ok(policy) => config.duplicate_params = policy,
                Err(e) => warn!(error = %e, "ignoring WEBHOOK_DUPLICATE_PARAMS"),
            }
        }
        if let Some(v) = lookup("WEBHOOK_MAX_BODY_BYTES") {
            match v.parse::<usize>() {
                Ok(n) => config.max_body_bytes = n,
                Err(e) => warn!(value = %v, error = %e, "ignoring WEBHOOK_MAX_BODY_BYTES"),
            }
        }

        config
    }
}
