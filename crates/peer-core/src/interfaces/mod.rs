// crates/peer-core/src/interfaces/mod.rs
// ============================================================================
// Module: Peer Network Interfaces
// Description: Transport-agnostic endorser and broadcast client contracts.
// Purpose: Define the network seams used by chaincode deployment.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Deployment talks to two external services: endorsers, which simulate and
//! sign proposals, and the ordering service, which accepts finished
//! transaction envelopes. Both are reached through the traits below so the
//! deployment flow never depends on a concrete transport. Timeouts belong to
//! the implementations; callers pass a [`RequestContext`] to bound or cancel
//! a call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::Envelope;
use crate::core::ProposalResponse;
use crate::core::RequestContext;
use crate::core::SignedProposal;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Network client errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request context was cancelled or its deadline passed.
    #[error("request cancelled or deadline exceeded")]
    Cancelled,
    /// Transport-level failure (connect, send, receive).
    #[error("transport error: {0}")]
    Transport(String),
    /// The remote service rejected the request.
    #[error("remote rejected request (status {status}): {message}")]
    Rejected {
        /// Remote status code.
        status: u16,
        /// Remote message.
        message: String,
    },
    /// The remote answer could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The client was used after being closed.
    #[error("client is closed")]
    Closed,
}

// ============================================================================
// SECTION: Endorser Client
// ============================================================================

/// Client submitting signed proposals for endorsement.
pub trait EndorserClient: Send + Sync {
    /// Submits a signed proposal.
    ///
    /// `Ok(None)` means the endorser produced no response; callers treat it as
    /// "nothing to broadcast", not as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails or the context is done.
    fn process_proposal(
        &self,
        ctx: &RequestContext,
        proposal: &SignedProposal,
    ) -> Result<Option<ProposalResponse>, ClientError>;
}

// ============================================================================
// SECTION: Broadcast Client
// ============================================================================

/// Client sending envelopes to the ordering service.
///
/// # Invariants
/// - `close` is called once per deployment attempt by its owner.
pub trait BroadcastClient: Send + Sync {
    /// Sends an envelope for ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the send fails.
    fn send(&self, envelope: &Envelope) -> Result<(), ClientError>;

    /// Releases the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when release fails; callers treat this as best effort.
    fn close(&self) -> Result<(), ClientError>;
}
