//! # Simulated Threshold Commitments
//!
//! Generates a commitment bundle answering "does `actual_value` meet
//! `threshold`?" for a named claim. Read this paragraph before using it:
//! **this is not a zero-knowledge proof.** The threshold verdict is
//! revealed in plaintext, the commitment provides no soundness against a
//! dishonest prover, and nothing here is verifiable by a third party who
//! doesn't trust the issuer. The one-wayness of SHA-256 is the only
//! property on offer. The contract is documented, callers depend on it,
//! and upgrading it silently to a real range proof would be a breaking
//! change wearing a halo — don't.
//!
//! ## Construction
//!
//! ```text
//! threshold_met   = actual_value >= threshold          (ties count as met)
//! commitment_hash = SHA-256(claim ":" actual_value ":" nonce)      nonce: 32 hex chars, fresh
//! proof_hash      = SHA-256(commitment_hash ":" "true"|"false")
//! verification_key = 64 hex chars, fresh, bound to nothing
//! ```
//!
//! The fresh nonce makes `commitment_hash` non-deterministic by design:
//! two calls with identical inputs produce different bundles, so observers
//! can't correlate commitments by value.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::{COMMITMENT_NONCE_BYTES, VERIFICATION_KEY_BYTES};
use crate::random::RandomSource;

/// A threshold commitment bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commitment {
    /// The claim text, echoed verbatim.
    pub claim: String,
    /// Whether `actual_value >= threshold`. Revealed directly — this
    /// bundle hides the verdict from nobody.
    pub threshold_met: bool,
    /// SHA-256 over claim, value, and a fresh nonce; hex, 64 chars.
    /// Different on every call even for identical inputs.
    pub commitment_hash: String,
    /// SHA-256 binding the commitment hash to the verdict; hex, 64 chars.
    pub proof_hash: String,
    /// 64 fresh hex characters, unrelated to any of the above. Exists
    /// because the wire contract says it does.
    pub verification_key: String,
}

/// Generate a commitment for `claim` with the given threshold and value.
///
/// Infallible for any `i64` inputs — out-of-range numbers never reach
/// this function because JSON deserialization into `i64` rejects them
/// rather than truncating.
pub fn generate(
    claim: &str,
    threshold: i64,
    actual_value: i64,
    rng: &dyn RandomSource,
) -> Commitment {
    // Integer comparison; a tie counts as met.
    let threshold_met = actual_value >= threshold;

    let nonce = rng.hex_token(COMMITMENT_NONCE_BYTES);
    let commitment_hash = hex::encode(Sha256::digest(
        format!("{}:{}:{}", claim, actual_value, nonce).as_bytes(),
    ));

    // Canonical bool tokens — "true"/"false", consistent across
    // implementations that recompute this hash.
    let verdict = if threshold_met { "true" } else { "false" };
    let proof_hash = hex::encode(Sha256::digest(
        format!("{}:{}", commitment_hash, verdict).as_bytes(),
    ));

    Commitment {
        claim: claim.to_string(),
        threshold_met,
        commitment_hash,
        proof_hash,
        verification_key: rng.hex_token(VERIFICATION_KEY_BYTES),
    }
}
