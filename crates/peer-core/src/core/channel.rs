// crates/peer-core/src/core/channel.rs
// ============================================================================
// Module: Channel Configuration
// Description: Channel configuration snapshot and protocol version selection.
// Purpose: Decide which chaincode lifecycle protocol a channel speaks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ChannelConfig`] is the snapshot returned by the configuration query a
//! deployment issues before instantiating chaincode. Its application
//! capabilities determine the [`ChannelProtocolVersion`]; channels without the
//! `V1_1` capability stay on the legacy lifecycle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ChaincodeName;
use crate::core::identifiers::ChannelId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Application capability that switches a channel to config-based lifecycle.
pub const V1_1_CAPABILITY: &str = "V1_1";

// ============================================================================
// SECTION: Protocol Version
// ============================================================================

/// Chaincode lifecycle protocol spoken by a channel.
///
/// # Invariants
/// - Exactly one variant applies to a given configuration snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelProtocolVersion {
    /// Lifecycle system chaincode deployment (pre config-based lifecycle).
    Legacy,
    /// Config-based lifecycle where chaincode definitions live in channel config.
    V1_1,
}

impl ChannelProtocolVersion {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::V1_1 => "v1_1",
        }
    }
}

// ============================================================================
// SECTION: Channel Config
// ============================================================================

/// Chaincode definition stored in the channel resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChaincodeDefinition {
    /// Chaincode name.
    pub name: ChaincodeName,
    /// Chaincode version label.
    pub version: String,
    /// Endorsement system chaincode (plugin) name.
    pub endorsement_plugin: String,
    /// Validation system chaincode (plugin) name.
    pub validation_plugin: String,
    /// Opaque endorsement policy bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub endorsement_policy: Vec<u8>,
}

/// Channel configuration snapshot.
///
/// # Invariants
/// - `sequence` increases by one with every committed config update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Channel the snapshot belongs to.
    pub channel_id: ChannelId,
    /// Config sequence number.
    pub sequence: u64,
    /// Application capabilities enabled on the channel.
    #[serde(default)]
    pub application_capabilities: BTreeSet<String>,
    /// Chaincode definitions keyed by chaincode name.
    #[serde(default)]
    pub chaincodes: BTreeMap<ChaincodeName, ChaincodeDefinition>,
}

impl ChannelConfig {
    /// Returns the lifecycle protocol version implied by the capabilities.
    #[must_use]
    pub fn protocol_version(&self) -> ChannelProtocolVersion {
        if self.application_capabilities.contains(V1_1_CAPABILITY) {
            ChannelProtocolVersion::V1_1
        } else {
            ChannelProtocolVersion::Legacy
        }
    }
}
