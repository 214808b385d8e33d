// crates/peer-core/src/core/mod.rs
// ============================================================================
// Module: Peer Core Types
// Description: Canonical peer protocol messages, identities, and identifiers.
// Purpose: Provide stable, serializable types shared by ACL and deployment code.
// Dependencies: serde, serde_jcs, sha2, ed25519-dalek
// ============================================================================

//! ## Overview
//! Core types define the wire shapes exchanged with endorsers and the
//! ordering service. Every signed payload is canonical JSON (RFC 8785) so
//! signatures and transaction identifiers are reproducible across processes.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod channel;
pub mod context;
pub mod encoding;
pub mod hashing;
pub mod identifiers;
pub mod identity;
pub mod proposal;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use channel::ChaincodeDefinition;
pub use channel::ChannelConfig;
pub use channel::ChannelProtocolVersion;
pub use channel::V1_1_CAPABILITY;
pub use context::RequestContext;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::ChaincodeName;
pub use identifiers::ChannelId;
pub use identifiers::MspId;
pub use identifiers::TxId;
pub use identity::Ed25519Identity;
pub use identity::IdentityError;
pub use identity::SerializedIdentity;
pub use identity::SigningIdentity;
pub use identity::verify_signature;
pub use proposal::ChaincodeDeploymentSpec;
pub use proposal::ChaincodeInput;
pub use proposal::ChaincodeLanguage;
pub use proposal::ChaincodeSpec;
pub use proposal::ChannelHeader;
pub use proposal::ConfigSignature;
pub use proposal::ConfigUpdate;
pub use proposal::ConfigUpdateEnvelope;
pub use proposal::Endorsement;
pub use proposal::Envelope;
pub use proposal::Header;
pub use proposal::HeaderType;
pub use proposal::Payload;
pub use proposal::Proposal;
pub use proposal::ProposalResponse;
pub use proposal::ProtocolError;
pub use proposal::ResponseStatus;
pub use proposal::SignatureHeader;
pub use proposal::SignedData;
pub use proposal::SignedProposal;
pub use proposal::TransactionAction;
pub use time::now_unix_millis;
