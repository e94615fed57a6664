//! Webhook request signature verification for Hookgate.
//!
//! A sender signs each webhook by computing HMAC-SHA1 over a canonical string
//! (the URL it called followed by the sorted request parameters) with a shared
//! secret, and sends the base64 result in a request header. This crate rebuilds
//! the canonical string on the receiving side and checks the signature against
//! every secret in a [`KeyRing`], so old and new secrets can overlap during a
//! rotation.
//!
//! # Usage
//!
//! ```rust
//! use hookgate_auth::{FailureReason, KeyRing, KeyRingHandle, VerificationResult, verify};
//!
//! let handle = KeyRingHandle::new(KeyRing::from_secrets(["token"]).unwrap());
//!
//! let result = verify(
//!     "https://hooks.example.com/sms",
//!     [("From", "+15550001111"), ("Body", "hello")],
//!     None,
//!     &handle.snapshot(),
//! );
//! assert_eq!(result, VerificationResult::Failure(FailureReason::MissingSignature));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string construction
//! - [`error`] - Key ring construction errors
//! - [`keyring`] - Signing keys, the key ring, and the rotation handle
//! - [`signature`] - HMAC-SHA1 signing and timing-safe comparison
//! - [`verify`] - Request verification entry point

pub mod canonical;
pub mod error;
pub mod keyring;
pub mod signature;
pub mod verify;

pub use canonical::{CanonicalInput, build_canonical_string};
pub use error::KeyRingError;
pub use keyring::{KeyRing, KeyRingHandle, SigningKey};
pub use verify::{FailureReason, VerificationResult, sign, signature_excerpt, verify, verify_input};
