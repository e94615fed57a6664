//! Webhook signature verification as a hyper service.
//!
//! This crate is the transport adapter around `hookgate-auth`. It turns an HTTP
//! request into verification input and a verification result into an HTTP
//! response:
//!
//! - **Request extraction** ([`request`]): rebuilds the signed URL, decodes form
//!   parameters under a duplicate-name policy, reads the signature header.
//! - **Service** ([`service`]): the [`WebhookHttpService`](service::WebhookHttpService)
//!   hyper `Service` tying extraction, verification, and dispatch together.
//! - **Dispatch** ([`dispatch`]): the [`WebhookHandler`](dispatch::WebhookHandler)
//!   trait run only for verified requests.
//! - **Response** ([`response`]): the uniform rejection and other fixed responses.
//! - **Body** ([`body`]): the [`WebhookBody`](body::WebhookBody) response body.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> WebhookHttpService (hyper Service)
//!     -> Health check interception
//!     -> Body collection (size-limited)
//!     -> URL + form parameter + signature extraction
//!     -> hookgate_auth::verify against the current key ring snapshot
//!     -> 403 on any failure | WebhookHandler on success
//!     -> Common response headers (x-request-id, Server)
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hookgate_auth::{KeyRing, KeyRingHandle};
//! use hookgate_http::{AcknowledgeHandler, WebhookHttpConfig, WebhookHttpService};
//!
//! let keyring = Arc::new(KeyRingHandle::new(KeyRing::from_secrets(["token"]).unwrap()));
//! let config = WebhookHttpConfig::default();
//! let service = WebhookHttpService::new(AcknowledgeHandler, keyring, config);
//! // Use `service` with a hyper server.
//! # let _ = service;
//! ```

pub mod body;
pub mod dispatch;
pub mod request;
pub mod response;
pub mod service;

pub use body::WebhookBody;
pub use dispatch::{AcknowledgeHandler, VerifiedWebhook, WebhookHandler};
pub use request::RequestError;
pub use service::{WebhookHttpConfig, WebhookHttpService};
