// crates/peer-config/src/lib.rs
// ============================================================================
// Module: Peer Config Library
// Description: Configuration model and loader for the peer tooling.
// Purpose: Provide strict, fail-closed configuration with hard limits.
// Dependencies: peer-acl, peer-chaincode, serde, toml, url
// ============================================================================

//! ## Overview
//! [`PeerConfig`] is the single configuration document used by the `peer`
//! binary. It is loaded from TOML with size and path limits and validated
//! before use.

pub mod config;

pub use config::ChaincodeSection;
pub use config::ConfigError;
pub use config::IdentitySection;
pub use config::PeerConfig;
pub use config::PeerSection;
