// crates/peer-chaincode/src/lifecycle.rs
// ============================================================================
// Module: Config-Based Lifecycle
// Description: Chaincode definition updates for config-based channels.
// Purpose: Write the chaincode definition into channel config, then init.
// Dependencies: peer-core, serde_json, tracing
// ============================================================================

//! ## Overview
//! On config-based channels the chaincode definition is written into the
//! channel resource tree with a signed config update before the chaincode is
//! initialized. The signed update can be saved to a file instead of being
//! broadcast, so other administrators can review it; a saved update is later
//! loaded and broadcast by a second run.
//!
//! Security posture: loaded envelopes are untrusted input. Reads are size
//! limited and the envelope must be a config update for the requested
//! channel.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;

use peer_core::ChannelConfig;
use peer_core::ConfigUpdateEnvelope;
use peer_core::Envelope;
use peer_core::HeaderType;

use crate::error::DeployError;
use crate::proposals::create_config_update_envelope;
use crate::request::DeployContext;
use crate::request::InstantiateRequest;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a resource envelope file.
pub const MAX_ENVELOPE_FILE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Lifecycle Update
// ============================================================================

/// Runs the config-based lifecycle update and then `send_init`.
///
/// With a load path the previously signed envelope is broadcast. Otherwise a
/// new envelope is built against `config`; with a save path it is written to
/// disk and the call ends without broadcasting or initializing.
///
/// # Errors
///
/// Returns [`DeployError::EnvelopeIo`] for file failures,
/// [`DeployError::LifecycleUpdate`] for invalid envelopes,
/// [`DeployError::Broadcast`] when sending fails, and errors from `send_init`.
pub fn config_based_lifecycle_update<F>(
    ctx: &DeployContext,
    request: &InstantiateRequest,
    config: &ChannelConfig,
    send_init: F,
) -> Result<(), DeployError>
where
    F: FnOnce(&DeployContext) -> Result<(), DeployError>,
{
    let envelope = if let Some(path) = &request.resource_envelope_load_path {
        let envelope = load_envelope(path)?;
        validate_loaded_envelope(&envelope, request)?;
        tracing::info!(path = %path.display(), "loaded signed resource envelope");
        envelope
    } else {
        let envelope = create_config_update_envelope(request, config, ctx.signer.as_ref())?;
        if let Some(path) = &request.resource_envelope_save_path {
            save_envelope(path, &envelope)?;
            tracing::info!(
                path = %path.display(),
                channel = %request.channel_id,
                chaincode = %request.name,
                "saved signed resource envelope; skipping broadcast and init"
            );
            return Ok(());
        }
        envelope
    };

    ctx.broadcast.send(&envelope).map_err(|err| DeployError::Broadcast(err.to_string()))?;
    tracing::info!(
        channel = %request.channel_id,
        chaincode = %request.name,
        "chaincode definition update broadcast"
    );
    send_init(ctx)
}

/// Checks that a loaded envelope is a config update for the request's channel.
fn validate_loaded_envelope(
    envelope: &Envelope,
    request: &InstantiateRequest,
) -> Result<(), DeployError> {
    let payload = envelope
        .decode_payload()
        .map_err(|err| DeployError::LifecycleUpdate(err.to_string()))?;
    let channel_header = &payload.header.channel_header;
    if channel_header.header_type != HeaderType::ConfigUpdate {
        return Err(DeployError::LifecycleUpdate(
            "loaded envelope is not a config update".to_string(),
        ));
    }
    if channel_header.channel_id != request.channel_id {
        return Err(DeployError::LifecycleUpdate(format!(
            "loaded envelope targets channel {}, expected {}",
            channel_header.channel_id, request.channel_id
        )));
    }
    let update = ConfigUpdateEnvelope::from_bytes(&payload.data)
        .and_then(|update_envelope| update_envelope.update())
        .map_err(|err| DeployError::LifecycleUpdate(err.to_string()))?;
    if update.channel_id != request.channel_id {
        return Err(DeployError::LifecycleUpdate(format!(
            "loaded config update targets channel {}, expected {}",
            update.channel_id, request.channel_id
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Envelope Files
// ============================================================================

/// Reads an envelope file with a size limit.
fn load_envelope(path: &Path) -> Result<Envelope, DeployError> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            DeployError::EnvelopeIo(format!("envelope file not found: {}", path.display()))
        } else {
            DeployError::EnvelopeIo(err.to_string())
        }
    })?;
    let limit = u64::try_from(MAX_ENVELOPE_FILE_BYTES)
        .map_err(|_| DeployError::EnvelopeIo("envelope size limit overflow".to_string()))?;
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| DeployError::EnvelopeIo(err.to_string()))?;
    if bytes.len() > MAX_ENVELOPE_FILE_BYTES {
        return Err(DeployError::EnvelopeIo(format!(
            "envelope file exceeds {MAX_ENVELOPE_FILE_BYTES} bytes"
        )));
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| DeployError::LifecycleUpdate(format!("invalid envelope file: {err}")))
}

/// Writes an envelope file as JSON.
fn save_envelope(path: &Path, envelope: &Envelope) -> Result<(), DeployError> {
    let bytes = serde_json::to_vec_pretty(envelope)
        .map_err(|err| DeployError::EnvelopeIo(err.to_string()))?;
    std::fs::write(path, bytes).map_err(|err| DeployError::EnvelopeIo(err.to_string()))
}
