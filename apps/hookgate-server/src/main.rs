//! Hookgate Server - webhook gateway with signature verification.
//!
//! This binary serves [`hookgate_http::WebhookHttpService`]: every inbound
//! webhook is checked against the configured signing secrets before it reaches
//! the application handler, and every failed check is answered with the same
//! `403`.
//!
//! # Usage
//!
//! ```text
//! WEBHOOK_AUTH_TOKENS=current,previous hookgate-server
//! ```
//!
//! Send `SIGHUP` to re-read `WEBHOOK_AUTH_TOKENS_FILE` and rotate keys without
//! a restart.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `WEBHOOK_AUTH_TOKENS` | *(unset)* | Comma-separated signing secrets |
//! | `WEBHOOK_AUTH_TOKENS_FILE` | *(unset)* | Secrets file, re-read on `SIGHUP` |
//! | `WEBHOOK_SIGNATURE_HEADER` | `X-Twilio-Signature` | Signature header name |
//! | `WEBHOOK_PUBLIC_URL` | *(unset)* | Public base URL seen by the sender |
//! | `WEBHOOK_DUPLICATE_PARAMS` | `reject` | `reject`, `first`, or `last` |
//! | `WEBHOOK_MAX_BODY_BYTES` | `1048576` | Request body limit |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod keys;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hookgate_auth::KeyRingHandle;
use hookgate_core::GatewayConfig;
use hookgate_http::{AcknowledgeHandler, WebhookHandler, WebhookHttpConfig, WebhookHttpService};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: WebhookHandler>(
    listener: TcpListener,
    service: WebhookHttpService<H>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Probe the local health endpoint. Succeeds only on a `200 OK` from Hookgate.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"service\":\"hookgate\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for container health probes.
    if std::env::args().any(|a| a == "--health-check") {
        let config = GatewayConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = GatewayConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        signature_header = %config.signature_header,
        public_url = ?config.public_url,
        duplicate_params = %config.duplicate_params,
        max_body_bytes = config.max_body_bytes,
        version = VERSION,
        "starting Hookgate Server",
    );

    let keyring = Arc::new(KeyRingHandle::new(keys::load_keyring(&config)?));
    info!(
        keys = keyring.snapshot().len(),
        "loaded webhook signing keys"
    );

    let http_config = WebhookHttpConfig::from_gateway_config(&config)
        .context("invalid HTTP configuration")?;
    let service = WebhookHttpService::new(AcknowledgeHandler, Arc::clone(&keyring), http_config);

    let listen = &config.gateway_listen;
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid bind address: {listen}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    let reload = keys::spawn_reload_on_hangup(config, Arc::clone(&keyring))?;

    let result = serve(listener, service).await;
    reload.abort();
    result
}
