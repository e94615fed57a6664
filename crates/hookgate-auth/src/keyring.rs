//! Signing keys, the immutable key ring, and the shared rotation handle.
//!
//! A [`KeyRing`] is an ordered, non-empty list of [`SigningKey`]s. It is never
//! mutated after construction; rotation installs a whole new ring through a
//! [`KeyRingHandle`]. Readers take an `Arc` snapshot and verify against it
//! outside the lock, so an in-flight verification always sees one ring in full.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::KeyRingError;

/// An opaque shared secret used to sign webhook requests.
///
/// The secret bytes are never printed: `Debug` is redacted and the type
/// implements no serialization or equality trait.
#[derive(Clone)]
pub struct SigningKey(Box<[u8]>);

impl SigningKey {
    /// Create a signing key from raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyRingError::EmptyKey`] if `secret` is empty.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, KeyRingError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(KeyRingError::EmptyKey);
        }
        Ok(Self(secret.into_boxed_slice()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// An ordered, non-empty collection of signing keys.
///
/// Order matters: verification tries keys front to back and reports the index
/// of the first match. During a rotation window the ring typically holds the
/// new secret and the one it replaces.
///
/// # Examples
///
/// ```
/// use hookgate_auth::KeyRing;
///
/// let ring = KeyRing::from_secrets(["new-token", "old-token"]).unwrap();
/// assert_eq!(ring.len(), 2);
/// assert!(KeyRing::from_secrets(Vec::<String>::new()).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: Arc<[SigningKey]>,
}

impl KeyRing {
    /// Create a key ring from already-validated signing keys.
    ///
    /// # Errors
    ///
    /// Returns [`KeyRingError::EmptyKeyRing`] if `keys` is empty.
    pub fn new(keys: Vec<SigningKey>) -> Result<Self, KeyRingError> {
        if keys.is_empty() {
            return Err(KeyRingError::EmptyKeyRing);
        }
        Ok(Self { keys: keys.into() })
    }

    /// Create a key ring from configured secret strings, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`KeyRingError::EmptyKeyAt`] with the position of the first empty
    /// secret, or [`KeyRingError::EmptyKeyRing`] if there are no secrets at all.
    pub fn from_secrets<I, S>(secrets: I) -> Result<Self, KeyRingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let keys = secrets
            .into_iter()
            .enumerate()
            .map(|(index, secret)| {
                SigningKey::new(secret.as_ref()).map_err(|_| KeyRingError::EmptyKeyAt(index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(keys)
    }

    /// Number of keys in the ring. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over the keys in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &SigningKey> {
        self.keys.iter()
    }
}

/// Shared, atomically replaceable reference to the current [`KeyRing`].
///
/// Cloning the handle is not provided; share it behind an `Arc`. Both sides of
/// the lock hold it for a single pointer operation: a reader for one `Arc`
/// clone, a writer for one pointer swap. Verification runs on the snapshot with
/// no lock held.
#[derive(Debug)]
pub struct KeyRingHandle {
    current: RwLock<Arc<KeyRing>>,
    generation: AtomicU64,
}

impl KeyRingHandle {
    /// Create a handle holding the initial key ring.
    #[must_use]
    pub fn new(ring: KeyRing) -> Self {
        Self {
            current: RwLock::new(Arc::new(ring)),
            generation: AtomicU64::new(0),
        }
    }

    /// Take a snapshot of the ring currently in effect.
    #[must_use]
    pub fn snapshot(&self) -> Arc<KeyRing> {
        Arc::clone(&self.current.read())
    }

    /// Install a new key ring, returning the ring it replaced.
    ///
    /// Snapshots taken before the call keep the old ring alive until dropped.
    pub fn replace(&self, ring: KeyRing) -> Arc<KeyRing> {
        let ring = Arc::new(ring);
        let previous = std::mem::replace(&mut *self.current.write(), ring);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::info!(
            generation,
            previous_keys = previous.len(),
            "replaced webhook key ring"
        );
        previous
    }

    /// Number of replacements performed since construction.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
