//! Core types, configuration, and secret loading for Hookgate.
//!
//! This crate provides the pieces shared by the HTTP adapter and the server
//! binary: environment-driven configuration, the duplicate form parameter
//! policy, and loading of the webhook signing secrets from the environment or
//! a file. It deliberately knows nothing about signature verification itself.

mod config;
mod error;
mod secrets;
mod types;

pub use config::GatewayConfig;
pub use error::{HookgateError, HookgateResult};
pub use secrets::{load_secrets, split_secrets};
pub use types::DuplicateParamPolicy;
