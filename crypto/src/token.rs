//! # Authenticated Encryption Tokens
//!
//! Self-contained encrypted tokens: everything needed to verify integrity
//! and decrypt travels in one opaque byte string — except the key and the
//! password, which obviously never leave the caller.
//!
//! ## Token layout
//!
//! ```text
//! version (1) || timestamp (8, big-endian seconds) || nonce (12) || ciphertext + tag (16)
//! ```
//!
//! The 21-byte header is bound into the AES-256-GCM tag as AAD, so the
//! version marker, creation timestamp, and nonce are all covered by the
//! same authentication check as the ciphertext. One tag, everything
//! protected — the same goals as the classic version/timestamp/IV/MAC
//! token scheme, with the AEAD doing the MAC's job.
//!
//! ## Nonce management
//!
//! GCM is notoriously unforgiving about nonce reuse: same key + same nonce
//! twice and an attacker recovers the XOR of the plaintexts and can forge
//! tags. Our keys are salted per encryption, so a key is used for exactly
//! one token in normal operation — and the nonce is still drawn fresh from
//! the CSPRNG anyway, because defense shouldn't depend on callers behaving.
//!
//! ## Failure semantics
//!
//! [`decrypt`] fails with exactly one error for every cause: wrong key,
//! flipped bit, truncation, unknown version, malformed header. Internally
//! the cause goes to the debug log; externally there is no oracle.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};

use crate::config::{
    TOKEN_HEADER_LENGTH, TOKEN_MIN_LENGTH, TOKEN_NONCE_LENGTH, TOKEN_VERSION,
};
use crate::error::CryptoError;
use crate::kdf::DerivedKey;
use crate::random::RandomSource;

/// Encrypt plaintext into a self-contained authenticated token.
///
/// Consumes 12 bytes of entropy for the nonce; otherwise side-effect free.
/// Encryption has no failure mode for a valid key and arbitrary plaintext —
/// the `Result` exists because the cipher API is fallible on paper, and we
/// refuse to `unwrap` in library code.
pub fn encrypt(
    plaintext: &[u8],
    key: &DerivedKey,
    rng: &dyn RandomSource,
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| CryptoError::Internal("cipher initialization failed".into()))?;

    let mut header = Vec::with_capacity(TOKEN_HEADER_LENGTH);
    header.push(TOKEN_VERSION);
    header.extend_from_slice(&(Utc::now().timestamp() as u64).to_be_bytes());

    let mut nonce_bytes = [0u8; TOKEN_NONCE_LENGTH];
    rng.fill_bytes(&mut nonce_bytes);
    header.extend_from_slice(&nonce_bytes);

    let nonce = Nonce::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| CryptoError::Internal("encryption failed".into()))?;

    let mut token = header;
    token.reserve(ciphertext.len());
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Decrypt a token, verifying integrity before returning any plaintext.
///
/// # Errors
///
/// Always [`CryptoError::DecryptionFailed`] — whether the key is wrong,
/// the token was tampered with, the version byte is unknown, or the input
/// is too short to be a token at all. We don't distinguish these cases
/// on purpose.
pub fn decrypt(token: &[u8], key: &DerivedKey) -> Result<Vec<u8>, CryptoError> {
    if token.len() < TOKEN_MIN_LENGTH {
        tracing::debug!(len = token.len(), "token shorter than minimum layout");
        return Err(CryptoError::DecryptionFailed);
    }

    if token[0] != TOKEN_VERSION {
        tracing::debug!(version = token[0], "unknown token version byte");
        return Err(CryptoError::DecryptionFailed);
    }

    let (header, ciphertext) = token.split_at(TOKEN_HEADER_LENGTH);
    let nonce = Nonce::from_slice(&header[header.len() - TOKEN_NONCE_LENGTH..]);

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| {
            tracing::debug!("token failed authentication");
            CryptoError::DecryptionFailed
        })
}

/// Read the creation timestamp from a token header without decrypting.
///
/// Returns `None` for anything too short or carrying the wrong version
/// byte. The value is *unauthenticated* until [`decrypt`] succeeds on the
/// same token — use it for ordering and diagnostics, never for trust
/// decisions.
pub fn issued_at(token: &[u8]) -> Option<DateTime<Utc>> {
    if token.len() < TOKEN_MIN_LENGTH || token[0] != TOKEN_VERSION {
        return None;
    }
    let mut ts = [0u8; 8];
    ts.copy_from_slice(&token[1..9]);
    Utc.timestamp_opt(u64::from_be_bytes(ts) as i64, 0).single()
}

/// Encode a token for the wire: URL-safe base64, padded.
pub fn encode(token: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE.encode(token)
}

/// Decode a wire-format token.
///
/// Failures fold into [`CryptoError::DecryptionFailed`] — a token that
/// isn't even base64 gets the same answer as one with a bad tag, because
/// this decoder only exists on the decrypt path and the uniform-failure
/// rule covers the whole path.
pub fn decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
    base64::engine::general_purpose::URL_SAFE
        .decode(encoded)
        .map_err(|_| {
            tracing::debug!("token is not valid base64");
            CryptoError::DecryptionFailed
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf;
    use crate::random::OsRandom;

    fn test_key() -> DerivedKey {
        let salt = kdf::Salt::from_bytes(&[7u8; 16]).unwrap();
        let (key, _) = kdf::derive("test password", Some(salt), &OsRandom);
        key
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = test_key();
        let token = encrypt(b"the quick brown fox", &key, &OsRandom).unwrap();
        let plaintext = decrypt(&token, &key).unwrap();
        assert_eq!(plaintext, b"the quick brown fox");
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let key = test_key();
        let token = encrypt(b"", &key, &OsRandom).unwrap();
        // Header + tag only.
        assert_eq!(token.len(), TOKEN_MIN_LENGTH);
        assert!(decrypt(&token, &key).unwrap().is_empty());
    }

    #[test]
    fn wrong_key_fails() {
        let key = test_key();
        let salt = kdf::Salt::from_bytes(&[8u8; 16]).unwrap();
        let (wrong, _) = kdf::derive("test password", Some(salt), &OsRandom);

        let token = encrypt(b"secret", &key, &OsRandom).unwrap();
        let err = decrypt(&token, &wrong).unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed));
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        // Exhaustive over a short token: flip each bit once, decryption
        // must fail every time. Covers header (version, timestamp, nonce)
        // and ciphertext alike, since the AAD binds the header.
        let key = test_key();
        let token = encrypt(b"x", &key, &OsRandom).unwrap();

        for byte_idx in 0..token.len() {
            for bit in 0..8 {
                let mut tampered = token.clone();
                tampered[byte_idx] ^= 1 << bit;
                assert!(
                    decrypt(&tampered, &key).is_err(),
                    "bit {} of byte {} not detected",
                    bit,
                    byte_idx
                );
            }
        }
    }

    #[test]
    fn truncated_token_fails() {
        let key = test_key();
        let token = encrypt(b"secret", &key, &OsRandom).unwrap();
        assert!(decrypt(&token[..TOKEN_MIN_LENGTH - 1], &key).is_err());
        assert!(decrypt(&[], &key).is_err());
    }

    #[test]
    fn unknown_version_fails() {
        let key = test_key();
        let mut token = encrypt(b"secret", &key, &OsRandom).unwrap();
        token[0] = 0x81;
        assert!(decrypt(&token, &key).is_err());
    }

    #[test]
    fn nonces_are_unique_across_calls() {
        // Same key, same plaintext, two calls — the nonce portion must
        // differ. If this fails, the RNG is broken and we have much
        // bigger problems than a red test.
        let key = test_key();
        let t1 = encrypt(b"message", &key, &OsRandom).unwrap();
        let t2 = encrypt(b"message", &key, &OsRandom).unwrap();
        assert_ne!(&t1[9..TOKEN_HEADER_LENGTH], &t2[9..TOKEN_HEADER_LENGTH]);
        assert_ne!(t1, t2);
    }

    #[test]
    fn issued_at_reads_header_timestamp() {
        let key = test_key();
        let before = Utc::now().timestamp();
        let token = encrypt(b"when", &key, &OsRandom).unwrap();
        let after = Utc::now().timestamp();

        let ts = issued_at(&token).unwrap().timestamp();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn issued_at_rejects_garbage() {
        assert!(issued_at(&[]).is_none());
        assert!(issued_at(&[0x00; 64]).is_none());
    }

    #[test]
    fn wire_encoding_round_trips() {
        let key = test_key();
        let token = encrypt(b"wire", &key, &OsRandom).unwrap();
        let encoded = encode(&token);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(token, decoded);
        // URL-safe alphabet only.
        assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || "-_=".contains(c)));
    }

    #[test]
    fn wire_decode_failure_is_uniform() {
        let err = decode("definitely %% not base64").unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed));
    }
}
