//! # Password Key Derivation
//!
//! Turns a password and salt into a 32-byte AES key via PBKDF2-HMAC-SHA256
//! at 100,000 iterations. Slow on purpose — the iteration count is the
//! entire defense against offline guessing, so resist the urge to "optimize"
//! it.
//!
//! ## Determinism
//!
//! For a fixed (password, salt) pair the output is bit-identical on every
//! call and across processes. No per-process secret, no pepper, nothing
//! environmental mixed in. This is load-bearing: decryption reconstructs
//! the key from the password and the salt that rode along with the token,
//! so any hidden input would brick every issued token.
//!
//! ## Salt handling
//!
//! Encryption generates a fresh 16-byte salt from the injected
//! [`RandomSource`]; decryption supplies the original one. The salt is not
//! secret — it exists to make precomputation tables useless — but it is
//! mandatory.

use std::fmt;

use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;

use crate::config::{KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};
use crate::error::CryptoError;
use crate::random::RandomSource;

/// A 16-byte key-derivation salt. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Generate a fresh random salt.
    pub fn generate(rng: &dyn RandomSource) -> Self {
        let mut bytes = [0u8; SALT_LENGTH];
        rng.fill_bytes(&mut bytes);
        Salt(bytes)
    }

    /// Construct a salt from raw bytes. Rejects anything but exactly
    /// 16 bytes — a truncated salt silently derives a different key,
    /// which is the kind of bug that eats data.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; SALT_LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::Input(format!("salt must be {} bytes", SALT_LENGTH)))?;
        Ok(Salt(arr))
    }

    /// Raw salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }

    /// Encode for the wire: URL-safe base64, padded — the alphabet the
    /// HTTP contract speaks.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::URL_SAFE.encode(self.0)
    }

    /// Decode a wire-format salt.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let bytes = base64::engine::general_purpose::URL_SAFE
            .decode(encoded)
            .map_err(|_| CryptoError::Input("salt is not valid base64".into()))?;
        Self::from_bytes(&bytes)
    }
}

/// A derived 32-byte symmetric key.
///
/// Exists only for the duration of one operation; never persisted, never
/// serialized. The `Debug` impl is redacted so a stray `{:?}` in a log
/// line can't leak key material.
#[derive(Clone)]
pub struct DerivedKey([u8; KEY_LENGTH]);

impl DerivedKey {
    /// Raw key bytes, sized for AES-256-GCM.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive a key from a password and an optional salt.
///
/// When `salt` is `None` (the encrypt path), a fresh one is generated from
/// `rng`. When it is supplied (the decrypt path), the derivation is fully
/// deterministic. The password may be any string, including empty — a bad
/// password produces a key that fails authentication downstream, which is
/// exactly the failure mode we want.
///
/// This call burns 100,000 HMAC rounds of CPU. Callers on an async runtime
/// should dispatch it to a blocking worker, not the request thread.
pub fn derive(password: &str, salt: Option<Salt>, rng: &dyn RandomSource) -> (DerivedKey, Salt) {
    let salt = salt.unwrap_or_else(|| Salt::generate(rng));
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut key,
    );
    (DerivedKey(key), salt)
}
