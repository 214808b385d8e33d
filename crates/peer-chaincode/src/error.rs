// crates/peer-chaincode/src/error.rs
// ============================================================================
// Module: Deployment Errors
// Description: Step-tagged failures of the deployment dispatcher.
// Purpose: Let callers see which step of a deployment failed.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Each dispatcher step maps to exactly one [`DeployError`] variant. Nothing
//! is retried; the first failure ends the attempt.

use thiserror::Error;

/// Deployment dispatcher errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - The variant names the step that failed.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Channel identifier was empty.
    #[error("the required parameter 'channelID' is empty; rerun the command with -C flag")]
    MissingChannel,
    /// Channel configuration could not be fetched or understood.
    #[error("failed to probe channel lifecycle version: {0}")]
    VersionProbe(String),
    /// Chaincode specification could not be built.
    #[error("invalid chaincode specification: {0}")]
    ChaincodeSpec(String),
    /// Deployment specification could not be encoded.
    #[error("failed to encode deployment spec: {0}")]
    DeploymentSpec(String),
    /// Signing identity could not be serialized.
    #[error("error serializing identity for {identity}: {reason}")]
    SerializeIdentity {
        /// Diagnostic identifier of the signer.
        identity: String,
        /// Serialization failure detail.
        reason: String,
    },
    /// Deploy proposal could not be created.
    #[error("failed to create deploy proposal: {0}")]
    CreateProposal(String),
    /// Proposal could not be signed.
    #[error("failed to sign proposal: {0}")]
    SignProposal(String),
    /// Endorsement call failed.
    #[error("endorsement failed: {0}")]
    Endorse(String),
    /// Signed transaction could not be assembled from the responses.
    #[error("failed to assemble signed transaction: {0}")]
    AssembleTx(String),
    /// Broadcast to the ordering service failed.
    #[error("broadcast failed: {0}")]
    Broadcast(String),
    /// Config-based lifecycle update could not be built or validated.
    #[error("config-based lifecycle update failed: {0}")]
    LifecycleUpdate(String),
    /// Resource envelope file could not be read or written.
    #[error("resource envelope file error: {0}")]
    EnvelopeIo(String),
}
