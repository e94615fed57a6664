//! Webhook request verification against a key ring.
//!
//! [`verify`] is the entry point used by the transport layer. It never panics
//! on hostile input and never returns an error: every outcome is a
//! [`VerificationResult`]. Turning a failure into a rejection, and keeping the
//! rejection uniform across reasons, is the caller's job.

use tracing::debug;

use crate::canonical::{CanonicalInput, build_canonical_string};
use crate::keyring::{KeyRing, SigningKey};
use crate::signature::{compute_signature, decode_signature, matches_key};

/// Number of leading signature characters kept by [`signature_excerpt`].
const EXCERPT_LEN: usize = 8;

/// Why a request failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum FailureReason {
    /// The request carried no signature value.
    #[error("missing request signature")]
    MissingSignature,

    /// The signature is not valid padded base64.
    #[error("malformed request signature")]
    MalformedSignature,

    /// No key in the ring produced a matching signature.
    #[error("request signature does not match any signing key")]
    NoKeyMatched,
}

/// Outcome of verifying one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationResult {
    /// The signature matched the key at `matched_key_index` in the ring.
    Success {
        /// Position of the first matching key, for audit logging.
        matched_key_index: usize,
    },
    /// The request must be rejected.
    Failure(FailureReason),
}

impl VerificationResult {
    /// Whether verification succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure reason, if verification failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(reason) => Some(*reason),
        }
    }

    /// Convert into a `Result` carrying the matched key index.
    ///
    /// # Errors
    ///
    /// Returns the [`FailureReason`] when verification failed.
    pub fn into_result(self) -> Result<usize, FailureReason> {
        match self {
            Self::Success { matched_key_index } => Ok(matched_key_index),
            Self::Failure(reason) => Err(reason),
        }
    }
}

/// Verify a webhook request signature.
///
/// `signature` is the raw header value; `None` and the empty string both count
/// as a missing signature. Keys are tried in ring order and the first match wins.
///
/// # Examples
///
/// ```
/// use hookgate_auth::{KeyRing, VerificationResult, sign, verify};
///
/// let ring = KeyRing::from_secrets(["current", "previous"]).unwrap();
/// let params = [("From", "+1"), ("Body", "hi")];
///
/// let key = ring.iter().nth(1).unwrap();
/// let signature = sign("https://a.test/sms", params, key);
///
/// let result = verify("https://a.test/sms", params, Some(&signature), &ring);
/// assert_eq!(result, VerificationResult::Success { matched_key_index: 1 });
/// ```
#[must_use]
pub fn verify<'a, I>(
    url: &str,
    params: I,
    signature: Option<&str>,
    keyring: &KeyRing,
) -> VerificationResult
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let Some(signature) = signature.filter(|s| !s.is_empty()) else {
        debug!(%url, "webhook request has no signature");
        return VerificationResult::Failure(FailureReason::MissingSignature);
    };

    let Some(provided) = decode_signature(signature) else {
        debug!(
            %url,
            signature = %signature_excerpt(signature),
            "webhook signature is not valid base64"
        );
        return VerificationResult::Failure(FailureReason::MalformedSignature);
    };

    let canonical = build_canonical_string(url, params);

    match keyring
        .iter()
        .position(|key| matches_key(key, canonical.as_bytes(), &provided))
    {
        Some(matched_key_index) => {
            debug!(%url, matched_key_index, "webhook signature verified");
            VerificationResult::Success { matched_key_index }
        }
        None => {
            debug!(
                %url,
                signature = %signature_excerpt(signature),
                keys = keyring.len(),
                "webhook signature does not match any key"
            );
            VerificationResult::Failure(FailureReason::NoKeyMatched)
        }
    }
}

/// Verify the signature of a request already collected into a [`CanonicalInput`].
#[must_use]
pub fn verify_input(
    input: &CanonicalInput,
    signature: Option<&str>,
    keyring: &KeyRing,
) -> VerificationResult {
    verify(&input.url, input.pairs(), signature, keyring)
}

/// Compute the signature a sender would attach to a request.
#[must_use]
pub fn sign<'a, I>(url: &str, params: I, key: &SigningKey) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    compute_signature(key, build_canonical_string(url, params).as_bytes())
}

/// A short, log-safe view of a signature: the first few characters followed by
/// an ellipsis.
///
/// # Examples
///
/// ```
/// use hookgate_auth::signature_excerpt;
///
/// assert_eq!(signature_excerpt("7/zfauXrL6LSdBbV8YTfnCWafHk="), "7/zfauXr...");
/// assert_eq!(signature_excerpt("abc"), "abc");
/// ```
#[must_use]
pub fn signature_excerpt(signature: &str) -> String {
    if let Some((end, _)) = signature.char_indices().nth(EXCERPT_LEN) {
        format!("{}...", &signature[..end])
    } else {
        signature.to_owned()
    }
}
