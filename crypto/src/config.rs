//! # Configuration & Constants
//!
//! Every magic number in VAULT lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! Several of these values are part of the wire contract (token layout,
//! DID prefix, hash lengths). Changing them invalidates every token and
//! identifier ever issued, so treat this file like a protocol document,
//! not a tuning knob.

// ---------------------------------------------------------------------------
// Service Identity
// ---------------------------------------------------------------------------

/// Service identifier reported by the health endpoint.
pub const SERVICE_NAME: &str = "crypto-services";

// ---------------------------------------------------------------------------
// Key Derivation
// ---------------------------------------------------------------------------

/// PBKDF2 iteration count. 100,000 rounds of HMAC-SHA256 — the classic
/// OWASP-era number the wire contract was issued under. Raising it would
/// silently break decryption of existing tokens (the iteration count is
/// not embedded in the token), so it stays put.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes. 16 random bytes per encryption; the salt travels
/// alongside the token and is required to reconstruct the key.
pub const SALT_LENGTH: usize = 16;

/// Derived key length in bytes. 32 bytes feeds AES-256-GCM directly.
pub const KEY_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Token Layout
// ---------------------------------------------------------------------------

/// Token format version marker. A single leading byte, same role as
/// Fernet's version octet. Bump only with a migration story.
pub const TOKEN_VERSION: u8 = 0x80;

/// Creation timestamp width: 8 bytes, big-endian seconds since the epoch.
pub const TOKEN_TIMESTAMP_LENGTH: usize = 8;

/// AES-256-GCM nonce length in bytes. 96 bits is the standard and the only
/// length you should use. 12 bytes. Not 16. Not 8. Twelve.
pub const TOKEN_NONCE_LENGTH: usize = 12;

/// GCM authentication tag length in bytes.
pub const TOKEN_TAG_LENGTH: usize = 16;

/// Token header length: version || timestamp || nonce. The header is bound
/// into the GCM tag as AAD, so none of it can be altered undetected.
pub const TOKEN_HEADER_LENGTH: usize = 1 + TOKEN_TIMESTAMP_LENGTH + TOKEN_NONCE_LENGTH;

/// Smallest well-formed token: a full header plus the tag of an empty
/// ciphertext. Anything shorter is rejected without touching the cipher.
pub const TOKEN_MIN_LENGTH: usize = TOKEN_HEADER_LENGTH + TOKEN_TAG_LENGTH;

// ---------------------------------------------------------------------------
// Identifiers & Commitments
// ---------------------------------------------------------------------------

/// DID method name. Identifiers read `did:vault:<32 hex chars>`.
pub const DID_METHOD: &str = "vault";

/// DID prefix, preassembled because every caller wants the whole thing.
pub const DID_PREFIX: &str = "did:vault:";

/// Number of hex characters of the identity hash kept in the DID.
/// 32 hex chars = 128 bits, plenty of collision resistance for identifiers.
pub const DID_HASH_CHARS: usize = 32;

/// DID proof nonce: 8 random bytes, 16 hex characters on the wire.
pub const DID_NONCE_BYTES: usize = 8;

/// Commitment nonce: 16 random bytes, 32 hex characters.
pub const COMMITMENT_NONCE_BYTES: usize = 16;

/// Commitment verification key: 32 random bytes, 64 hex characters.
pub const VERIFICATION_KEY_BYTES: usize = 32;

/// Maximum nesting depth accepted by the canonical serializer. Deeper
/// input is rejected as a structural-encoding error rather than risking
/// a stack overflow on adversarial payloads. Kept below serde_json's own
/// parser recursion limit (128) so the rejection always comes from us,
/// with our error shape, not from the JSON parser.
pub const CANONICAL_MAX_DEPTH: usize = 64;
