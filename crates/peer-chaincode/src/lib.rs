// crates/peer-chaincode/src/lib.rs
// ============================================================================
// Module: Peer Chaincode Library
// Description: Chaincode instantiation dispatch for permissioned channels.
// Purpose: Probe the channel lifecycle version and run the matching flow.
// Dependencies: peer-core, rand, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! The deployment dispatcher instantiates chaincode on a channel. Every call to
//! [`chaincode_deploy`] probes the channel configuration afresh, then either
//! runs the legacy lifecycle-system-chaincode flow ([`lscc_instantiate`]) or
//! the config-based lifecycle update ([`config_based_lifecycle_update`]).
//!
//! The flow is sequential and blocking. Network collaborators are reached only
//! through [`peer_core::EndorserClient`] and [`peer_core::BroadcastClient`];
//! the broadcast client is closed exactly once per deployment attempt.
//!
//! Security posture: proposals and envelopes are signed with the caller's
//! [`peer_core::SigningIdentity`]; endorsement responses are untrusted input
//! and are checked before assembly.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod deploy;
pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod probe;
pub mod proposals;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use deploy::chaincode_deploy;
pub use deploy::instantiate;
pub use deploy::lscc_instantiate;
pub use error::DeployError;
pub use guard::BroadcastGuard;
pub use lifecycle::MAX_ENVELOPE_FILE_BYTES;
pub use lifecycle::config_based_lifecycle_update;
pub use probe::fetch_channel_config;
pub use request::DEFAULT_ESCC;
pub use request::DEFAULT_VSCC;
pub use request::DeployContext;
pub use request::InstantiateRequest;
