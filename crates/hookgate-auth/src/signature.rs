//! HMAC-SHA1 signing and timing-safe signature comparison.
//!
//! ```text
//! Signature = Base64(HMAC-SHA1(SigningKey, CanonicalString))
//! ```
//!
//! SHA-1 is fixed by the sending party's scheme and is not configurable.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::keyring::SigningKey;

type HmacSha1 = Hmac<Sha1>;

/// Length in bytes of an HMAC-SHA1 digest.
pub const DIGEST_LEN: usize = 20;

/// Compute the raw HMAC-SHA1 digest of `canonical` under `key`.
#[must_use]
pub fn compute_digest(key: &SigningKey, canonical: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can accept any key length");
    mac.update(canonical);
    mac.finalize().into_bytes().to_vec()
}

/// Compute the transport form of a signature: padded standard base64 of the digest.
///
/// # Examples
///
/// ```
/// use hookgate_auth::SigningKey;
/// use hookgate_auth::signature::compute_signature;
///
/// let key = SigningKey::new("secret").unwrap();
/// let signature = compute_signature(&key, b"https://a.test/");
/// assert_eq!(signature.len(), 28);
/// assert!(signature.ends_with('='));
/// ```
#[must_use]
pub fn compute_signature(key: &SigningKey, canonical: &[u8]) -> String {
    BASE64.encode(compute_digest(key, canonical))
}

/// Decode a transport signature into raw digest bytes.
///
/// Returns `None` when the value is not valid padded standard base64.
#[must_use]
pub fn decode_signature(signature: &str) -> Option<Vec<u8>> {
    BASE64.decode(signature).ok()
}

/// Compare two digests without leaking the position of the first difference.
///
/// A length mismatch returns early: every genuine digest has length
/// [`DIGEST_LEN`], which is public. Equal-length inputs are always compared in
/// full.
#[must_use]
pub fn digests_match(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected.ct_eq(provided).into()
}

/// Check a decoded signature against the digest computed with one key.
#[must_use]
pub fn matches_key(key: &SigningKey, canonical: &[u8], provided: &[u8]) -> bool {
    digests_match(&compute_digest(key, canonical), provided)
}
