// crates/peer-core/src/core/identity.rs
// ============================================================================
// Module: Signing Identities
// Description: Signing identity contract and the ed25519 identity.
// Purpose: Serialize proposal creators and sign or verify protocol payloads.
// Dependencies: ed25519-dalek, base64, serde, serde_jcs
// ============================================================================

//! ## Overview
//! A signing identity serializes itself as the creator of proposals and signs
//! canonical payload bytes. The serialized form is a [`SerializedIdentity`]
//! (MSP id plus public key bytes) in canonical JSON, which verifiers decode to
//! check signatures.
//!
//! Security posture: private key material never leaves [`Ed25519Identity`]
//! and is never formatted by `Debug`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::hashing::canonical_json_bytes;
use crate::core::hashing::hex_encode;
use crate::core::identifiers::MspId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of an ed25519 secret or public key in bytes.
const ED25519_KEY_LEN: usize = 32;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identity serialization, signing, and verification errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Identity could not be serialized.
    #[error("identity serialization failed: {0}")]
    Serialize(String),
    /// Serialized identity bytes could not be decoded.
    #[error("invalid serialized identity: {0}")]
    Decode(String),
    /// Key material is malformed.
    #[error("invalid key material: {0}")]
    KeyMaterial(String),
    /// Signing failed.
    #[error("signing failed: {0}")]
    Sign(String),
    /// Signature did not verify.
    #[error("signature verification failed")]
    BadSignature,
}

// ============================================================================
// SECTION: Serialized Identity
// ============================================================================

/// Wire form of an identity embedded as proposal creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializedIdentity {
    /// Owning MSP identifier.
    pub msp_id: MspId,
    /// Public key bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub id_bytes: Vec<u8>,
}

impl SerializedIdentity {
    /// Encodes the identity as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Serialize`] when canonicalization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IdentityError> {
        canonical_json_bytes(self).map_err(|err| IdentityError::Serialize(err.to_string()))
    }

    /// Decodes an identity from its serialized bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Decode`] when the bytes are not a serialized identity.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdentityError> {
        if bytes.is_empty() {
            return Err(IdentityError::Decode("empty identity".to_string()));
        }
        serde_json::from_slice(bytes).map_err(|err| IdentityError::Decode(err.to_string()))
    }

    /// Returns the ed25519 verifying key carried by the identity.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyMaterial`] when the key bytes are invalid.
    pub fn verifying_key(&self) -> Result<VerifyingKey, IdentityError> {
        let key: [u8; ED25519_KEY_LEN] = self.id_bytes.as_slice().try_into().map_err(|_| {
            IdentityError::KeyMaterial(format!("expected {ED25519_KEY_LEN} byte public key"))
        })?;
        VerifyingKey::from_bytes(&key).map_err(|err| IdentityError::KeyMaterial(err.to_string()))
    }
}

// ============================================================================
// SECTION: Signing Identity Contract
// ============================================================================

/// Identity able to serialize itself and sign payloads.
pub trait SigningIdentity: Send + Sync {
    /// Serializes the identity for use as a proposal creator.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the identity cannot be serialized.
    fn serialize(&self) -> Result<Vec<u8>, IdentityError>;

    /// Returns a human-readable identifier for diagnostics.
    fn identifier(&self) -> String;

    /// Signs the message bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when signing fails.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, IdentityError>;
}

// ============================================================================
// SECTION: Ed25519 Identity
// ============================================================================

/// Ed25519 signing identity bound to an MSP.
pub struct Ed25519Identity {
    /// Owning MSP identifier.
    msp_id: MspId,
    /// Private signing key.
    signing_key: SigningKey,
}

impl Ed25519Identity {
    /// Creates an identity from a signing key.
    #[must_use]
    pub const fn new(msp_id: MspId, signing_key: SigningKey) -> Self {
        Self {
            msp_id,
            signing_key,
        }
    }

    /// Creates an identity from raw secret key bytes.
    #[must_use]
    pub fn from_secret_bytes(msp_id: MspId, secret: &[u8; ED25519_KEY_LEN]) -> Self {
        Self::new(msp_id, SigningKey::from_bytes(secret))
    }

    /// Creates an identity from key material: 32 raw bytes or base64 text.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::KeyMaterial`] when the material is not a 32-byte key.
    pub fn from_key_material(msp_id: MspId, material: &[u8]) -> Result<Self, IdentityError> {
        if material.len() == ED25519_KEY_LEN {
            let key: [u8; ED25519_KEY_LEN] = material
                .try_into()
                .map_err(|_| IdentityError::KeyMaterial("invalid raw key".to_string()))?;
            return Ok(Self::from_secret_bytes(msp_id, &key));
        }
        let not_key = || IdentityError::KeyMaterial("key must be raw bytes or base64".to_string());
        let text = std::str::from_utf8(material).map_err(|_| not_key())?;
        let decoded = BASE64.decode(text.trim().as_bytes()).map_err(|_| not_key())?;
        let key: [u8; ED25519_KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            IdentityError::KeyMaterial(format!("expected {ED25519_KEY_LEN} byte secret key"))
        })?;
        Ok(Self::from_secret_bytes(msp_id, &key))
    }

    /// Returns the serialized identity value.
    #[must_use]
    pub fn serialized_identity(&self) -> SerializedIdentity {
        SerializedIdentity {
            msp_id: self.msp_id.clone(),
            id_bytes: self.signing_key.verifying_key().to_bytes().to_vec(),
        }
    }

    /// Returns the owning MSP identifier.
    #[must_use]
    pub const fn msp_id(&self) -> &MspId {
        &self.msp_id
    }
}

impl fmt::Debug for Ed25519Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Identity")
            .field("msp_id", &self.msp_id)
            .field("identifier", &self.identifier())
            .finish_non_exhaustive()
    }
}

impl SigningIdentity for Ed25519Identity {
    fn serialize(&self) -> Result<Vec<u8>, IdentityError> {
        self.serialized_identity().to_bytes()
    }

    fn identifier(&self) -> String {
        let public = self.signing_key.verifying_key().to_bytes();
        format!("{}:{}", self.msp_id, hex_encode(&public[.. 8]))
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, IdentityError> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

// ============================================================================
// SECTION: Verification
// ============================================================================

/// Verifies `signature` over `message` against a serialized identity.
///
/// Uses strict verification: small-order keys and non-canonical signatures
/// are rejected. Returns the decoded identity on success.
///
/// # Errors
///
/// Returns [`IdentityError`] when the identity is malformed or the signature fails.
pub fn verify_signature(
    serialized_identity: &[u8],
    message: &[u8],
    signature: &[u8],
) -> Result<SerializedIdentity, IdentityError> {
    let identity = SerializedIdentity::from_bytes(serialized_identity)?;
    let key = identity.verifying_key()?;
    let signature = Signature::from_slice(signature).map_err(|_| IdentityError::BadSignature)?;
    key.verify_strict(message, &signature).map_err(|_| IdentityError::BadSignature)?;
    Ok(identity)
}
