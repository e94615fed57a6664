//! Error types for key ring construction.
//!
//! Verification outcomes are not errors and live in [`crate::verify`]; the
//! variants here only arise while building a [`KeyRing`](crate::KeyRing) from
//! configured secrets.

/// Errors that can occur while building signing keys or a key ring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyRingError {
    /// A key ring must hold at least one signing key.
    #[error("key ring must contain at least one signing key")]
    EmptyKeyRing,

    /// A signing key was constructed from an empty secret.
    #[error("signing key must not be empty")]
    EmptyKey,

    /// The secret at the given position of the configured list is empty.
    #[error("signing key at index {0} is empty")]
    EmptyKeyAt(usize),
}
