// crates/peer-core/src/lib.rs
// ============================================================================
// Module: Peer Core Library
// Description: Public API surface for the peer core.
// Purpose: Expose protocol types, identities, and network client contracts.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Peer core holds the types shared by access control and chaincode
//! deployment: channel and chaincode identifiers, signed proposal and envelope
//! messages, channel configuration, signing identities, and the endorser and
//! broadcast client contracts. It performs no network I/O itself.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::BroadcastClient;
pub use interfaces::ClientError;
pub use interfaces::EndorserClient;
