//! # Decentralized Identifier Generation
//!
//! Derives `did:vault:` identifiers deterministically from structured
//! identity data. Two callers holding the same logical identity — fields
//! in any order — get the same DID, every time, on every machine. That is
//! the entire point.
//!
//! ## Identifier format
//!
//! ```text
//! did:vault:<first 32 hex chars of SHA-256(canonical identity bytes)>
//! ```
//!
//! ## The provenance bundle
//!
//! Each generated DID ships with a proof object: a fresh nonce, a
//! verification-method reference (`<did>#key-1`), and a proof hash binding
//! the DID string to the canonical identity bytes. The proof hash uses the
//! *same* canonical serialization as the identifier itself, so any verifier
//! who recomputes the canonical form independently reproduces it. Note
//! what this is **not**: there is no signature here, and no key behind
//! `#key-1`. The bundle is provenance metadata from a trusted issuer, not
//! cryptographic proof of anything.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::canonical_json;
use crate::config::{DID_HASH_CHARS, DID_NONCE_BYTES, DID_PREFIX};
use crate::error::CryptoError;
use crate::random::RandomSource;

/// A generated decentralized identifier with its provenance bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Did {
    /// The identifier: `did:vault:` + 32 lowercase hex characters.
    pub id: String,
    /// Provenance metadata issued alongside the identifier.
    pub proof: DidProof,
}

/// Provenance metadata for a generated DID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DidProof {
    /// The DID this proof belongs to. Redundant with the parent on
    /// purpose — the proof object is designed to travel alone.
    pub did: String,
    /// Fresh 16-hex-char nonce, regenerated per call. The only
    /// non-deterministic field in the bundle.
    pub nonce: String,
    /// Verification-method reference: `<did>#key-1`.
    pub verification_method: String,
    /// SHA-256 over the DID string concatenated with the canonical
    /// identity bytes, hex-encoded (64 chars). Reproducible by any
    /// verifier who recomputes the canonical form.
    pub proof_hash: String,
}

/// Generate a DID and provenance bundle from structured identity data.
///
/// `id` and `proof_hash` are pure functions of the canonical identity
/// bytes; `nonce` is the only fresh field.
///
/// # Errors
///
/// [`CryptoError::Input`] when the identity data cannot be canonically
/// serialized (pathological nesting depth).
pub fn generate(identity: &Value, rng: &dyn RandomSource) -> Result<Did, CryptoError> {
    let canonical = canonical_json(identity)?;

    let identity_hash = hex::encode(Sha256::digest(&canonical));
    let id = format!("{}{}", DID_PREFIX, &identity_hash[..DID_HASH_CHARS]);

    // Same canonical bytes as the identifier hash — never a second,
    // ad hoc rendering of the identity.
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(&canonical);
    let proof_hash = hex::encode(hasher.finalize());

    let proof = DidProof {
        did: id.clone(),
        nonce: rng.hex_token(DID_NONCE_BYTES),
        verification_method: format!("{}#key-1", id),
        proof_hash,
    };

    Ok(Did { id, proof })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::OsRandom;
    use serde_json::json;

    #[test]
    fn did_has_expected_format() {
        let did = generate(&json!({"name": "alice"}), &OsRandom).unwrap();
        let suffix = did.id.strip_prefix("did:vault:").expect("prefix");
        assert_eq!(suffix.len(), 32);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn identical_content_yields_identical_id() {
        let a = generate(&json!({"name": "alice", "age": 30}), &OsRandom).unwrap();
        let b = generate(&json!({"age": 30, "name": "alice"}), &OsRandom).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.proof.proof_hash, b.proof.proof_hash);
    }

    #[test]
    fn nonce_is_fresh_per_call() {
        let identity = json!({"name": "alice"});
        let a = generate(&identity, &OsRandom).unwrap();
        let b = generate(&identity, &OsRandom).unwrap();
        assert_ne!(a.proof.nonce, b.proof.nonce);
        // ...while the deterministic fields stay put.
        assert_eq!(a.id, b.id);
        assert_eq!(a.proof.proof_hash, b.proof.proof_hash);
    }

    #[test]
    fn different_identities_diverge() {
        let a = generate(&json!({"name": "alice"}), &OsRandom).unwrap();
        let b = generate(&json!({"name": "alicf"}), &OsRandom).unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.proof.proof_hash, b.proof.proof_hash);
    }

    #[test]
    fn proof_fields_are_wired_to_the_id() {
        let did = generate(&json!({"k": "v"}), &OsRandom).unwrap();
        assert_eq!(did.proof.did, did.id);
        assert_eq!(did.proof.verification_method, format!("{}#key-1", did.id));
        assert_eq!(did.proof.nonce.len(), 16);
        assert_eq!(did.proof.proof_hash.len(), 64);
    }

    #[test]
    fn proof_hash_is_reproducible_by_a_verifier() {
        // A third party recomputing the canonical form must land on the
        // same proof hash.
        let identity = json!({"b": 2, "a": 1});
        let did = generate(&identity, &OsRandom).unwrap();

        let canonical = canonical_json(&identity).unwrap();
        let mut hasher = Sha256::new();
        hasher.update(did.id.as_bytes());
        hasher.update(&canonical);
        assert_eq!(did.proof.proof_hash, hex::encode(hasher.finalize()));
    }

    #[test]
    fn id_is_prefix_of_full_identity_hash() {
        let identity = json!({"name": "alice"});
        let did = generate(&identity, &OsRandom).unwrap();

        let canonical = canonical_json(&identity).unwrap();
        let full = hex::encode(Sha256::digest(&canonical));
        assert_eq!(did.id, format!("did:vault:{}", &full[..32]));
    }

    #[test]
    fn non_canonicalizable_input_is_rejected() {
        let mut v = json!(1);
        for _ in 0..200 {
            v = json!({"nested": v});
        }
        assert!(matches!(
            generate(&v, &OsRandom),
            Err(CryptoError::Input(_))
        ));
    }

    #[test]
    fn scalar_and_array_identities_work() {
        // The contract says "arbitrary structured data" — not just objects.
        assert!(generate(&json!(["a", "b"]), &OsRandom).is_ok());
        assert!(generate(&json!("bare string"), &OsRandom).is_ok());
        assert!(generate(&json!(null), &OsRandom).is_ok());
    }
}
