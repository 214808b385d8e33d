// crates/peer-chaincode/src/probe.rs
// ============================================================================
// Module: Channel Version Probe
// Description: Fetches the channel configuration through the endorser.
// Purpose: Decide which lifecycle protocol a channel speaks.
// Dependencies: peer-core, serde_json, tracing
// ============================================================================

//! ## Overview
//! The probe sends a signed `GetChannelConfig` query to the configuration
//! system chaincode and decodes the response payload as a
//! [`ChannelConfig`]. Results are never cached: every deployment probes anew.

use peer_core::ChannelConfig;
use peer_core::ChannelId;

use crate::error::DeployError;
use crate::proposals::create_config_query_proposal;
use crate::proposals::sign_proposal;
use crate::request::DeployContext;

/// Fetches the current configuration of `channel_id`.
///
/// # Errors
///
/// Returns [`DeployError::VersionProbe`] when the query cannot be built or
/// sent, the endorser returns nothing or a failing status, or the payload is
/// not a configuration for the requested channel.
pub fn fetch_channel_config(
    ctx: &DeployContext,
    channel_id: &ChannelId,
) -> Result<ChannelConfig, DeployError> {
    let creator = ctx.signer.serialize().map_err(|err| DeployError::VersionProbe(err.to_string()))?;
    let proposal = create_config_query_proposal(channel_id, creator)?;
    let signed = sign_proposal(&proposal, ctx.signer.as_ref())
        .map_err(|err| DeployError::VersionProbe(err.to_string()))?;

    let response = ctx
        .endorser
        .process_proposal(&ctx.request_ctx, &signed)
        .map_err(|err| DeployError::VersionProbe(err.to_string()))?
        .ok_or_else(|| DeployError::VersionProbe("endorser returned no response".to_string()))?;
    if !response.status.is_success() {
        return Err(DeployError::VersionProbe(format!(
            "config query failed with status {}: {}",
            response.status.0, response.message
        )));
    }

    let config: ChannelConfig = serde_json::from_slice(&response.payload)
        .map_err(|err| DeployError::VersionProbe(format!("undecodable channel config: {err}")))?;
    if &config.channel_id != channel_id {
        return Err(DeployError::VersionProbe(format!(
            "endorser returned config for channel {}, expected {channel_id}",
            config.channel_id
        )));
    }
    tracing::debug!(
        channel = %channel_id,
        sequence = config.sequence,
        version = config.protocol_version().as_str(),
        "fetched channel config"
    );
    Ok(config)
}
