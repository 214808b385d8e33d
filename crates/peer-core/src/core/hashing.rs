// crates/peer-core/src/core/hashing.rs
// ============================================================================
// Module: Peer Canonical Hashing
// Description: RFC 8785 JSON canonicalization and SHA-256 hashing utilities.
// Purpose: Provide deterministic bytes for signing and transaction identifiers.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Every signed payload in the peer protocol is canonical JSON (JCS) so two
//! processes serializing the same message produce identical bytes. Proposal
//! hashes and transaction identifiers are SHA-256 over those bytes.
//!
//! Security posture: canonical bytes are what signatures cover; never sign a
//! non-canonical serialization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Digest
// ============================================================================

/// SHA-256 digest in lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashDigest(String);

impl HashDigest {
    /// Creates a digest from raw digest bytes.
    #[must_use]
    pub fn from_digest_bytes(bytes: &[u8]) -> Self {
        Self(hex_encode(bytes))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical bytes.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Hashes canonical JSON with SHA-256.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<HashDigest, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(hash_bytes(&bytes))
}

/// Hashes raw bytes with SHA-256.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> HashDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    HashDigest::from_digest_bytes(&hasher.finalize())
}

/// Returns the lowercase hex SHA-256 digest of the bytes.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hash_bytes(bytes).0
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
