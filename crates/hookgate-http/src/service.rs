//! The webhook HTTP service implementing hyper's `Service` trait.
//!
//! [`WebhookHttpService`] is the adapter between HTTP and signature
//! verification. For each request it:
//!
//! 1. Answers health checks (`GET /health`, `GET /_health`) directly
//! 2. Collects the body up to the configured limit
//! 3. Rebuilds the signed URL and decodes the form parameters
//! 4. Verifies the signature against a snapshot of the current key ring
//! 5. Rejects every failure with the same `403`, or dispatches to the
//!    [`WebhookHandler`]
//! 6. Adds common response headers (`x-request-id`, `Server`)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::service::Service;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hookgate_auth::{
    CanonicalInput, KeyRingHandle, VerificationResult, signature_excerpt, verify_input,
};
use hookgate_core::{DuplicateParamPolicy, GatewayConfig, HookgateError};

use crate::body::WebhookBody;
use crate::dispatch::{VerifiedWebhook, WebhookHandler};
use crate::request::{RequestError, extract_params, reconstruct_url, signature_header};
use crate::response::{health_check_response, rejection_response, request_error_response};

/// Configuration for the webhook HTTP service.
#[derive(Debug, Clone)]
pub struct WebhookHttpConfig {
    /// Header carrying the base64 signature.
    pub signature_header: http::HeaderName,
    /// Externally visible base URL used to rebuild the signed URL.
    pub public_url: Option<String>,
    /// Policy for repeated form parameter names.
    pub duplicate_params: DuplicateParamPolicy,
    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for WebhookHttpConfig {
    fn default() -> Self {
        Self {
            signature_header: http::HeaderName::from_static("x-twilio-signature"),
            public_url: None,
            duplicate_params: DuplicateParamPolicy::Reject,
            max_body_bytes: 1_048_576,
        }
    }
}

impl WebhookHttpConfig {
    /// Build the HTTP configuration from the gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HookgateError::Config`] if the signature header name is not a
    /// valid HTTP header name.
    pub fn from_gateway_config(config: &GatewayConfig) -> Result<Self, HookgateError> {
        let signature_header = http::HeaderName::try_from(config.signature_header.as_str())
            .map_err(|e| {
                HookgateError::Config(format!(
                    "invalid signature header name {:?}: {e}",
                    config.signature_header
                ))
            })?;

        Ok(Self {
            signature_header,
            public_url: config.public_url.clone(),
            duplicate_params: config.duplicate_params,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

/// The webhook HTTP service.
///
/// # Type Parameters
///
/// - `H`: The application handler implementing [`WebhookHandler`].
#[derive(Debug)]
pub struct WebhookHttpService<H: WebhookHandler> {
    handler: Arc<H>,
    keyring: Arc<KeyRingHandle>,
    config: Arc<WebhookHttpConfig>,
}

impl<H: WebhookHandler> WebhookHttpService<H> {
    /// Create a new service.
    ///
    /// The key ring handle is shared: replacing the ring through it affects all
    /// requests that start afterwards.
    #[must_use]
    pub fn new(handler: H, keyring: Arc<KeyRingHandle>, config: WebhookHttpConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            keyring,
            config: Arc::new(config),
        }
    }
}

impl<H: WebhookHandler> Clone for WebhookHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            keyring: Arc::clone(&self.keyring),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H, B> Service<http::Request<B>> for WebhookHttpService<H>
where
    H: WebhookHandler,
    B: http_body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = http::Response<WebhookBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let keyring = Arc::clone(&self.keyring);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();

            let response =
                process_request(req, handler.as_ref(), &keyring, &config, &request_id).await;

            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Process an incoming HTTP request through the verification pipeline.
async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    keyring: &KeyRingHandle,
    config: &WebhookHttpConfig,
    request_id: &str,
) -> http::Response<WebhookBody>
where
    H: WebhookHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing webhook request");

    // 1. Health check interception.
    if is_health_check(&method, uri.path()) {
        return health_check_response();
    }

    // 2. Collect body.
    let (parts, incoming) = req.into_parts();
    let body = match collect_body(incoming, config.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, request_id, "failed to read webhook body");
            return request_error_response(&err);
        }
    };

    // 3. Extract verification input.
    let input = match extract_input(&parts, &body, config) {
        Ok(input) => input,
        Err(err) => {
            warn!(error = %err, %uri, request_id, "malformed webhook request");
            return request_error_response(&err);
        }
    };

    // 4. Verify against the ring in effect right now.
    let (result, excerpt) = {
        let signature = signature_header(&parts, &config.signature_header);
        let ring = keyring.snapshot();
        let result = verify_input(&input, signature.as_deref(), &ring);
        (result, signature.as_deref().map(signature_excerpt))
    };

    // 5. Reject uniformly or dispatch.
    let CanonicalInput { url, params } = input;
    match result {
        VerificationResult::Success { matched_key_index } => {
            info!(%url, matched_key_index, request_id, "webhook signature verified");
            handler
                .handle(VerifiedWebhook {
                    parts,
                    body,
                    params,
                    url,
                    matched_key_index,
                    request_id: request_id.to_owned(),
                })
                .await
        }
        VerificationResult::Failure(reason) => {
            warn!(
                %reason,
                %url,
                signature = ?excerpt,
                request_id,
                "rejected webhook request"
            );
            rejection_response()
        }
    }
}

/// Rebuild the signed URL and decode the signed parameters.
fn extract_input(
    parts: &http::request::Parts,
    body: &[u8],
    config: &WebhookHttpConfig,
) -> Result<CanonicalInput, RequestError> {
    let url = reconstruct_url(parts, config.public_url.as_deref())?;
    let params = extract_params(parts, body, config.duplicate_params)?;
    Ok(CanonicalInput { url, params })
}

/// Collect the body into `Bytes`, refusing anything larger than `limit`.
async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, RequestError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => Err(RequestError::BodyTooLarge { limit }),
        Err(err) => Err(RequestError::Body(err.to_string())),
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<WebhookBody>,
    request_id: &str,
) -> http::Response<WebhookBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::header::HeaderValue::from_str(request_id) {
        headers.insert("x-request-id", hv);
    }

    headers.insert(
        http::header::SERVER,
        http::header::HeaderValue::from_static("Hookgate"),
    );

    response
}
