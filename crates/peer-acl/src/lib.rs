// crates/peer-acl/src/lib.rs
// ============================================================================
// Module: Peer ACL Library
// Description: Access-control enforcement for protected peer resources.
// Purpose: Decide whether a caller may invoke a resource on a channel.
// Dependencies: peer-core, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! Peer ACL is the single authority that answers "may this caller invoke this
//! resource on this channel?". A process registers exactly one
//! [`PolicyProvider`] into an [`AclRegistry`] during startup; request paths
//! obtain an [`AclProviderHandle`] that consults per-resource overrides first
//! and falls through to the registered provider. Registering `None` installs
//! the deny-by-default [`DefaultAclProvider`], so "no policy configured" never
//! turns into "allowed".
//!
//! Security posture: every identity and resource string is untrusted input;
//! unknown resources and unrecognized identity shapes are errors, never
//! implicit allows.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod config_tx;
pub mod default_provider;
pub mod overrides;
pub mod provider;
pub mod registry;
pub mod resources;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AclConfig;
pub use config_tx::ConfigTxError;
pub use config_tx::ConfigTxProcessor;
pub use default_provider::BaselineDecision;
pub use default_provider::DefaultAclProvider;
pub use overrides::OverrideTable;
pub use provider::AclError;
pub use provider::FnPolicy;
pub use provider::IdentityInfo;
pub use provider::IdentityShape;
pub use provider::PolicyProvider;
pub use provider::policy_fn;
pub use registry::AclProviderHandle;
pub use registry::AclRegistry;
pub use registry::acl_provider;
pub use registry::config_tx_processor;
pub use registry::global_registry;
pub use registry::register_acl_provider;
pub use resources::PROPOSE;
pub use resources::PolicyRef;
pub use resources::ResourceSpec;

#[cfg(test)]
mod tests;
