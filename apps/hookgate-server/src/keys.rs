//! Key ring loading and SIGHUP-driven rotation.

use std::sync::Arc;

use anyhow::{Context, Result};
use hookgate_auth::{KeyRing, KeyRingHandle};
use hookgate_core::{GatewayConfig, load_secrets};
use tokio::task::JoinHandle;
use tracing::info;

/// Build a key ring from the configured secret source.
pub fn load_keyring(config: &GatewayConfig) -> Result<KeyRing> {
    let secrets = load_secrets(config).context("failed to load webhook signing secrets")?;
    KeyRing::from_secrets(&secrets).context("invalid webhook signing secrets")
}

/// Re-read the secret source and install the resulting ring.
///
/// On failure the current ring stays in place.
pub fn reload_keyring(config: &GatewayConfig, handle: &KeyRingHandle) -> Result<()> {
    let ring = load_keyring(config)?;
    let keys = ring.len();
    let _previous = handle.replace(ring);
    info!(
        keys,
        generation = handle.generation(),
        "reloaded webhook signing keys"
    );
    Ok(())
}

/// Install the `SIGHUP` handler and spawn the task that reloads the key ring
/// on every signal.
///
/// The handler is installed before this returns, so a signal sent afterwards is
/// never lost and an installation failure surfaces to the caller.
#[cfg(unix)]
pub fn spawn_reload_on_hangup(
    config: GatewayConfig,
    handle: Arc<KeyRingHandle>,
) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    Ok(tokio::spawn(reload_on_hangup(hangup, config, handle)))
}

/// Key reload on signal is only available on unix; elsewhere the task never
/// completes.
#[cfg(not(unix))]
pub fn spawn_reload_on_hangup(
    _config: GatewayConfig,
    _handle: Arc<KeyRingHandle>,
) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(std::future::pending()))
}

#[cfg(unix)]
async fn reload_on_hangup(
    mut hangup: tokio::signal::unix::Signal,
    config: GatewayConfig,
    handle: Arc<KeyRingHandle>,
) {
    use tracing::warn;

    while hangup.recv().await.is_some() {
        info!("received SIGHUP, reloading webhook signing keys");
        if let Err(e) = reload_keyring(&config, &handle) {
            warn!(error = %format!("{e:#}"), "key reload failed, keeping current keys");
        }
    }

    warn!("SIGHUP stream closed, key reload disabled");
}
