//! # Error Taxonomy
//!
//! Three failure kinds cover every operation in this crate, and the split
//! is deliberate:
//!
//! - [`CryptoError::Input`] — the caller sent something malformed or
//!   non-canonicalizable. Safe to describe; the caller needs the detail to
//!   fix their request.
//! - [`CryptoError::DecryptionFailed`] — anything that went wrong while
//!   decrypting. Wrong password, flipped bit, truncated token, wrong
//!   version byte: all of them collapse into this one variant. The
//!   difference is none of the caller's business — differentiated errors
//!   on a decrypt path are a padding-oracle starter kit.
//! - [`CryptoError::Internal`] — the operation itself misbehaved (hashing,
//!   entropy, serialization of our own output). Surfaced generically;
//!   detail belongs in logs, not responses.

use thiserror::Error;

/// Errors observable by callers of the core operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed or non-canonicalizable request data. The message is safe
    /// to surface — this is not a security-sensitive path.
    #[error("invalid input: {0}")]
    Input(String),

    /// Decryption failed. Deliberately carries no cause: wrong key,
    /// tampered data, and malformed tokens are indistinguishable here.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Unexpected internal failure. The message is for logs; transports
    /// must map this to a fixed generic response.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CryptoError {
    /// True when the failure is the caller's to fix (client-error class).
    pub fn is_input(&self) -> bool {
        matches!(self, CryptoError::Input(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decryption_failure_message_is_generic() {
        // The Display output crosses the transport boundary in logs and
        // must never name a cause.
        let msg = CryptoError::DecryptionFailed.to_string();
        assert_eq!(msg, "decryption failed");
    }

    #[test]
    fn input_errors_classify_as_client_side() {
        assert!(CryptoError::Input("bad".into()).is_input());
        assert!(!CryptoError::DecryptionFailed.is_input());
        assert!(!CryptoError::Internal("x".into()).is_input());
    }
}
