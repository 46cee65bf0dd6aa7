// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VAULT Crypto Services — Core Library
//!
//! The cryptographic core behind the VAULT sidecar: everything in here is a
//! stateless, request-scoped operation. No database, no sessions, no global
//! mutable anything — a request comes in, entropy and CPU go brrr, a value
//! comes out.
//!
//! VAULT takes a pragmatic stance: PBKDF2-HMAC-SHA256 for password key
//! derivation (boring, standardized, exactly what you want from a KDF),
//! AES-256-GCM for symmetric encryption (because NIST got that one right),
//! and SHA-256 for every identifier and commitment hash (interoperability
//! beats novelty when third parties recompute your hashes).
//!
//! ## Architecture
//!
//! - **kdf** — Password + salt in, 32-byte key out. Deterministic, slow on
//!   purpose.
//! - **token** — Authenticated encryption tokens. Tampering is detected
//!   before a single plaintext byte escapes.
//! - **canonical** — One canonical byte encoding for structured values, so
//!   hashing is reproducible regardless of how the caller ordered their maps.
//! - **did** — Deterministic `did:vault` identifiers with a provenance
//!   bundle.
//! - **commitment** — Simulated threshold commitments. Read the module docs
//!   before assuming these prove anything.
//! - **random** — The injected secure random capability shared by all of the
//!   above.
//! - **config** — Constants. All of them.
//! - **error** — The three failure kinds a caller can observe.
//!
//! ## Design Philosophy
//!
//! 1. Determinism where the contract demands it, fresh entropy everywhere
//!    else — and never the two confused.
//! 2. Decryption failures are one failure. Attackers don't get a hint menu.
//! 3. No unsafe code. We sleep at night.

pub mod canonical;
pub mod commitment;
pub mod config;
pub mod did;
pub mod error;
pub mod kdf;
pub mod random;
pub mod token;

pub use commitment::Commitment;
pub use did::{Did, DidProof};
pub use error::CryptoError;
pub use kdf::{DerivedKey, Salt};
pub use random::{OsRandom, RandomSource};
