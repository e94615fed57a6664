//! Integration tests for Hookgate server.
//!
//! These tests require a running Hookgate server at `localhost:8080` whose
//! signing secrets include `test-token` (override with `HOOKGATE_TEST_TOKEN`).
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! WEBHOOK_AUTH_TOKENS=test-token cargo run -p hookgate-server &
//! cargo test -p hookgate-integration -- --ignored
//! ```

use std::sync::Once;

use hookgate_auth::SigningKey;

static INIT: Once = Once::new();

/// Header the server reads the signature from.
pub const SIGNATURE_HEADER: &str = "X-Twilio-Signature";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("HOOKGATE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// A secret the server under test accepts.
#[must_use]
pub fn test_token() -> String {
    std::env::var("HOOKGATE_TEST_TOKEN").unwrap_or_else(|_| "test-token".to_owned())
}

/// Create an HTTP client for talking to the local server.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// Full URL of `path` on the server, exactly as the signer sees it.
#[must_use]
pub fn webhook_url(path: &str) -> String {
    format!("{}{path}", endpoint_url().trim_end_matches('/'))
}

/// Sign `params` posted to `url` with `secret`.
#[must_use]
pub fn sign_webhook(url: &str, params: &[(&str, &str)], secret: &str) -> String {
    let key = SigningKey::new(secret).unwrap_or_else(|e| panic!("invalid test secret: {e}"));
    hookgate_auth::sign(url, params.iter().copied(), &key)
}

/// Encode `params` as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn form_body(params: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// POST a form webhook, attaching `signature` when given.
pub async fn post_webhook(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, &str)],
    signature: Option<&str>,
) -> reqwest::Response {
    let mut req = client
        .post(url)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(form_body(params));
    if let Some(signature) = signature {
        req = req.header(SIGNATURE_HEADER, signature);
    }
    req.send()
        .await
        .unwrap_or_else(|e| panic!("failed to POST {url}: {e}"))
}

mod test_health;
mod test_webhook;
