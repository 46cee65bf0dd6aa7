//! # Secure Randomness
//!
//! Every operation that needs entropy — salts, nonces, verification keys —
//! draws it through the [`RandomSource`] trait instead of reaching for a
//! hidden global. The production implementation is [`OsRandom`], a
//! zero-sized handle over the operating system CSPRNG: thread-safe,
//! non-blocking after early boot, and shared freely across concurrent
//! requests.
//!
//! The trait seam exists so that *structural* test assertions (lengths,
//! encodings, field wiring) can run against a deterministic source. It is
//! not an invitation to inject a weak RNG in production — nothing outside
//! `#[cfg(test)]` constructs anything but [`OsRandom`].

use rand::RngCore;

/// A provider of cryptographically secure random bytes.
///
/// Implementations must be safe for concurrent use from multiple threads
/// and must not block callers waiting on entropy under normal operation.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Return `n` random bytes hex-encoded (2n lowercase hex characters).
    ///
    /// Convenience for the nonce and verification-key fields, which are
    /// hex strings on the wire.
    fn hex_token(&self, n: usize) -> String {
        let mut buf = vec![0u8; n];
        self.fill_bytes(&mut buf);
        hex::encode(buf)
    }
}

/// The operating system CSPRNG.
///
/// `OsRng` reads from the platform's secure source (getrandom(2),
/// BCryptGenRandom, etc.) and is the only implementation production code
/// paths ever see.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::rngs::OsRng.fill_bytes(dest);
    }
}

/// Deterministic byte source for structural tests.
///
/// Cycles over a fixed pattern. Exists only so tests can assert on field
/// wiring without flaky entropy; it has no place outside `#[cfg(test)]`.
#[cfg(test)]
pub struct FixedRandom(pub Vec<u8>);

#[cfg(test)]
impl RandomSource for FixedRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = self.0[i % self.0.len()];
        }
    }
}
