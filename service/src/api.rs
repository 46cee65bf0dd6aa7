//! # REST API
//!
//! Builds the axum router exposing the crypto operations. All endpoints
//! are stateless request/response; the only shared state is the random
//! source and the metrics registry.
//!
//! ## Endpoints
//!
//! | Method | Path                 | Description                            |
//! |--------|----------------------|----------------------------------------|
//! | POST   | `/encrypt`           | Password-encrypt a payload             |
//! | POST   | `/decrypt`           | Decrypt a previously issued token      |
//! | POST   | `/generate-did`      | Derive a DID from identity data        |
//! | POST   | `/generate-zk-proof` | Generate a simulated threshold proof   |
//! | GET    | `/health`            | Liveness probe                         |
//! | GET    | `/`                  | Service banner                         |
//!
//! ## Error discipline
//!
//! Every failure maps to a fixed, operation-independent body. Malformed
//! input gets a 400 with `"invalid request"`; anything on the decrypt path
//! gets `"decryption failed"`; everything else gets `"internal error"`.
//! No exception text, no cause hints, no stack traces — ever.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use vault_crypto::{commitment, config, did, kdf, token, CryptoError, RandomSource};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The service's reported version string.
    pub version: String,
    /// The process-wide secure random source, injected so the core stays
    /// testable and so nothing reaches for a hidden global.
    pub rng: Arc<dyn RandomSource>,
    /// Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS: this sidecar is fronted by the app server and
    // called from browser contexts.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/encrypt", post(encrypt_handler))
        .route("/decrypt", post(decrypt_handler))
        .route("/generate-did", post(generate_did_handler))
        .route("/generate-zk-proof", post(generate_zk_proof_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Deserialize)]
pub struct EncryptRequest {
    /// Plaintext to encrypt.
    pub data: String,
    /// Password the key is derived from. Any string, including empty.
    pub password: String,
}

/// Response body for `POST /encrypt`.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// The authenticated token, URL-safe base64.
    pub encrypted_data: String,
    /// The key-derivation salt, URL-safe base64. Required for decryption.
    pub salt: String,
    /// Always "success".
    pub status: String,
}

/// Request body for `POST /decrypt`.
#[derive(Debug, Deserialize)]
pub struct DecryptRequest {
    /// The token returned by `/encrypt`, URL-safe base64.
    pub encrypted_data: String,
    /// The password used at encryption time.
    pub password: String,
    /// The salt returned by `/encrypt`, URL-safe base64.
    pub salt: String,
}

/// Response body for `POST /decrypt`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// The recovered plaintext.
    pub decrypted_data: String,
    /// Always "success".
    pub status: String,
}

/// Request body for `POST /generate-did`.
#[derive(Debug, Deserialize)]
pub struct DidRequest {
    /// Arbitrary structured identity data.
    pub identity_data: Value,
}

/// Response body for `POST /generate-did`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DidResponse {
    /// The derived identifier: `did:vault:` + 32 hex chars.
    pub did: String,
    /// Provenance bundle.
    pub proof: DidProofBody,
    /// Always "success".
    pub status: String,
}

/// Wire shape of the DID provenance bundle.
#[derive(Debug, Serialize, Deserialize)]
pub struct DidProofBody {
    /// The DID this proof belongs to.
    pub did: String,
    /// Fresh 16-hex-char nonce. Kept as `timestamp` on the wire for
    /// compatibility with existing clients — it has never actually been
    /// a timestamp.
    pub timestamp: String,
    /// Verification-method reference: `<did>#key-1`.
    pub verification_method: String,
    /// Hash binding the DID to the canonical identity bytes; 64 hex chars.
    pub proof_hash: String,
}

/// Request body for `POST /generate-zk-proof`.
///
/// `threshold` and `actual_value` deserialize into `i64`; out-of-range
/// numbers are rejected by serde rather than truncated.
#[derive(Debug, Deserialize)]
pub struct ZkProofRequest {
    /// The claim text, echoed into the response.
    pub claim: String,
    /// Threshold to compare against.
    pub threshold: i64,
    /// The prover's actual value.
    pub actual_value: i64,
}

/// Response body for `POST /generate-zk-proof`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ZkProofResponse {
    /// The full proof bundle.
    pub proof: ZkProofBody,
    /// Whether the threshold was met. Duplicated at the top level for
    /// callers that only care about the verdict.
    pub valid: bool,
    /// Always "success".
    pub status: String,
}

/// Wire shape of the simulated proof bundle.
#[derive(Debug, Serialize, Deserialize)]
pub struct ZkProofBody {
    pub claim: String,
    /// Always "range_proof".
    pub proof_type: String,
    /// The commitment hash; fresh per call.
    pub commitment: String,
    pub proof_data: ZkProofData,
    /// 64 fresh hex chars.
    pub verification_key: String,
}

/// Inner proof data of the simulated proof bundle.
#[derive(Debug, Serialize, Deserialize)]
pub struct ZkProofData {
    /// Whether the threshold was met.
    pub valid: bool,
    /// Hash binding the commitment to the verdict.
    pub proof_hash: String,
}

/// Generic error body returned on any failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Fixed, operation-independent message.
    pub error: String,
    /// Always "error".
    pub status: String,
}

// ---------------------------------------------------------------------------
// Error Mapping
// ---------------------------------------------------------------------------

/// Transport-level error: a status code plus one of three fixed bodies.
///
/// The conversion from [`CryptoError`] is the *only* place failure detail
/// is narrowed to a response, which keeps the no-oracle rule in one spot.
#[derive(Debug)]
pub enum ApiError {
    /// 400 — the caller can fix this.
    Input,
    /// 500 — the single undifferentiated decryption failure.
    DecryptionFailed,
    /// 500 — something went wrong on our side; detail is in the logs.
    Internal,
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Input(detail) => {
                tracing::debug!(%detail, "rejecting malformed input");
                ApiError::Input
            }
            CryptoError::DecryptionFailed => ApiError::DecryptionFailed,
            CryptoError::Internal(detail) => {
                tracing::error!(%detail, "internal operation failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Input => (StatusCode::BAD_REQUEST, "invalid request"),
            ApiError::DecryptionFailed => (StatusCode::INTERNAL_SERVER_ERROR, "decryption failed"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal error"),
        };
        let body = ErrorBody {
            error: message.to_string(),
            status: "error".to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /` — service banner.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "VAULT Crypto Services API",
        "version": state.version,
        "status": "running",
    }))
}

/// `GET /health` — liveness probe for orchestrators.
///
/// Intentionally checks nothing beyond "the process answers" — there are
/// no subsystems to be unhealthy.
async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": config::SERVICE_NAME,
        })),
    )
}

/// Runs the CPU-heavy key derivation on the blocking pool so 100k PBKDF2
/// rounds never stall the async accept loop, and records the latency.
async fn derive_key_blocking(
    state: &AppState,
    password: String,
    salt: Option<kdf::Salt>,
) -> Result<(kdf::DerivedKey, kdf::Salt), ApiError> {
    let rng = Arc::clone(&state.rng);
    let histogram = state.metrics.kdf_latency_seconds.clone();

    tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let derived = kdf::derive(&password, salt, rng.as_ref());
        histogram.observe(started.elapsed().as_secs_f64());
        derived
    })
    .await
    .map_err(|e| {
        tracing::error!("key derivation task failed: {}", e);
        ApiError::Internal
    })
}

/// `POST /encrypt` — derive a key from the password with a fresh salt,
/// seal the payload into an authenticated token.
async fn encrypt_handler(
    State(state): State<AppState>,
    Json(req): Json<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    state.metrics.encrypt_total.inc();

    let (key, salt) = derive_key_blocking(&state, req.password, None).await?;
    let sealed = token::encrypt(req.data.as_bytes(), &key, state.rng.as_ref())?;

    Ok(Json(EncryptResponse {
        encrypted_data: token::encode(&sealed),
        salt: salt.to_base64(),
        status: "success".to_string(),
    }))
}

/// `POST /decrypt` — recompute the key from password and salt, verify the
/// token, return the plaintext.
///
/// Every failure on this path — bad base64, wrong-length salt, wrong
/// password, tampered token, non-UTF-8 plaintext — produces the same
/// generic response. The decoder errors fold in deliberately: "bad
/// encoding" is listed under the one generic failure in the contract.
async fn decrypt_handler(
    State(state): State<AppState>,
    Json(req): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>, ApiError> {
    state.metrics.decrypt_total.inc();

    let result = decrypt_inner(&state, req).await;
    if result.is_err() {
        state.metrics.decrypt_failures_total.inc();
    }
    result
}

async fn decrypt_inner(
    state: &AppState,
    req: DecryptRequest,
) -> Result<Json<DecryptResponse>, ApiError> {
    let sealed = token::decode(&req.encrypted_data)?;
    let salt = kdf::Salt::from_base64(&req.salt).map_err(|_| {
        tracing::debug!("salt failed to decode on decrypt path");
        ApiError::DecryptionFailed
    })?;

    let (key, _) = derive_key_blocking(state, req.password, Some(salt)).await?;
    let plaintext = token::decrypt(&sealed, &key)?;

    let decrypted_data = String::from_utf8(plaintext).map_err(|_| {
        tracing::debug!("decrypted payload is not valid UTF-8");
        ApiError::DecryptionFailed
    })?;

    Ok(Json(DecryptResponse {
        decrypted_data,
        status: "success".to_string(),
    }))
}

/// `POST /generate-did` — derive a deterministic identifier and provenance
/// bundle from the supplied identity data.
async fn generate_did_handler(
    State(state): State<AppState>,
    Json(req): Json<DidRequest>,
) -> Result<Json<DidResponse>, ApiError> {
    state.metrics.did_total.inc();

    let generated = did::generate(&req.identity_data, state.rng.as_ref()).map_err(|e| {
        if e.is_input() {
            state.metrics.input_errors_total.inc();
        }
        ApiError::from(e)
    })?;

    Ok(Json(DidResponse {
        did: generated.id,
        proof: DidProofBody {
            did: generated.proof.did,
            timestamp: generated.proof.nonce,
            verification_method: generated.proof.verification_method,
            proof_hash: generated.proof.proof_hash,
        },
        status: "success".to_string(),
    }))
}

/// `POST /generate-zk-proof` — generate a simulated threshold commitment.
async fn generate_zk_proof_handler(
    State(state): State<AppState>,
    Json(req): Json<ZkProofRequest>,
) -> Json<ZkProofResponse> {
    state.metrics.proof_total.inc();

    let c = commitment::generate(
        &req.claim,
        req.threshold,
        req.actual_value,
        state.rng.as_ref(),
    );

    Json(ZkProofResponse {
        valid: c.threshold_met,
        proof: ZkProofBody {
            claim: c.claim,
            proof_type: "range_proof".to_string(),
            commitment: c.commitment_hash,
            proof_data: ZkProofData {
                valid: c.threshold_met,
                proof_hash: c.proof_hash,
            },
            verification_key: c.verification_key,
        },
        status: "success".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
