//! Handler seam for verified webhooks.
//!
//! The service only calls a [`WebhookHandler`] after the signature has been
//! verified. What the webhook means to the application is entirely the
//! handler's business.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::body::WebhookBody;

/// A webhook request whose signature has been verified.
#[derive(Debug)]
pub struct VerifiedWebhook {
    /// Request head.
    pub parts: http::request::Parts,
    /// Raw request body.
    pub body: Bytes,
    /// Decoded form parameters that were covered by the signature.
    pub params: BTreeMap<String, String>,
    /// The absolute URL the signature was checked against.
    pub url: String,
    /// Position in the key ring of the key that matched.
    pub matched_key_index: usize,
    /// Request ID assigned by the service.
    pub request_id: String,
}

/// Trait for the application logic run after successful verification.
pub trait WebhookHandler: Send + Sync + 'static {
    /// Handle a verified webhook and produce an HTTP response.
    fn handle(
        &self,
        webhook: VerifiedWebhook,
    ) -> Pin<Box<dyn Future<Output = http::Response<WebhookBody>> + Send>>;
}

/// A handler that acknowledges every verified webhook with an empty `200 OK`.
#[derive(Debug, Clone, Default)]
pub struct AcknowledgeHandler;

impl WebhookHandler for AcknowledgeHandler {
    fn handle(
        &self,
        webhook: VerifiedWebhook,
    ) -> Pin<Box<dyn Future<Output = http::Response<WebhookBody>> + Send>> {
        Box::pin(async move {
            tracing::info!(
                url = %webhook.url,
                params = webhook.params.len(),
                matched_key_index = webhook.matched_key_index,
                request_id = %webhook.request_id,
                "acknowledged webhook"
            );
            let mut response = http::Response::new(WebhookBody::empty());
            *response.status_mut() = http::StatusCode::OK;
            response
        })
    }
}
