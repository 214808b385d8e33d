// crates/peer-acl/src/config_tx.rs
// ============================================================================
// Module: Config Transaction Processor
// Description: Simulation of resource config updates gated on ACL registration.
// Purpose: Refuse config transactions until access control is wired.
// Dependencies: peer-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`ConfigTxProcessor`] turns a resource config transaction into the config
//! update it would write. It borrows an [`AclRegistry`] and refuses to do
//! anything until that registry has a provider: a peer that has not wired
//! access control must not accept changes to the resource tree.
//!
//! After registration an absent envelope simulates to nothing. A present
//! envelope must carry a config update whose channel agrees with its header.
//!
//! Security posture: envelopes are untrusted input; any decode failure or
//! header mismatch is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use peer_core::ConfigUpdate;
use peer_core::ConfigUpdateEnvelope;
use peer_core::Envelope;
use peer_core::HeaderType;
use peer_core::ProtocolError;
use thiserror::Error;

use crate::registry::AclRegistry;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Config transaction processing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigTxError {
    /// No ACL provider has been registered yet.
    #[error("config transaction processed before an acl provider was registered")]
    NotRegistered,
    /// Envelope is not a well-formed resource config update.
    #[error("invalid config transaction: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Processor
// ============================================================================

/// Registry-gated processor for resource config transactions.
#[derive(Debug, Clone, Copy)]
pub struct ConfigTxProcessor<'a> {
    /// Registry whose registration state gates processing.
    registry: &'a AclRegistry,
}

impl<'a> ConfigTxProcessor<'a> {
    /// Creates a processor bound to `registry`.
    #[must_use]
    pub const fn new(registry: &'a AclRegistry) -> Self {
        Self {
            registry,
        }
    }

    /// Produces the config update `envelope` would apply.
    ///
    /// Returns `Ok(None)` when there is no envelope to simulate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigTxError::NotRegistered`] before any provider is
    /// registered and [`ConfigTxError::Invalid`] for malformed envelopes.
    pub fn generate_simulation_results(
        &self,
        envelope: Option<&Envelope>,
    ) -> Result<Option<ConfigUpdate>, ConfigTxError> {
        if !self.registry.is_registered() {
            tracing::warn!("config transaction rejected; acl provider not registered");
            return Err(ConfigTxError::NotRegistered);
        }
        let Some(envelope) = envelope else {
            return Ok(None);
        };
        let invalid = |err: ProtocolError| ConfigTxError::Invalid(err.to_string());
        let payload = envelope.decode_payload().map_err(invalid)?;
        let channel_header = &payload.header.channel_header;
        if channel_header.header_type != HeaderType::ConfigUpdate {
            return Err(ConfigTxError::Invalid("envelope is not a config update".to_string()));
        }
        let update = ConfigUpdateEnvelope::from_bytes(&payload.data)
            .and_then(|update_envelope| update_envelope.update())
            .map_err(invalid)?;
        if update.channel_id != channel_header.channel_id {
            return Err(ConfigTxError::Invalid(format!(
                "config update targets channel {}, header names {}",
                update.channel_id, channel_header.channel_id
            )));
        }
        tracing::debug!(
            channel = %update.channel_id,
            definitions = update.write_set.len(),
            "simulated config transaction"
        );
        Ok(Some(update))
    }
}
