// crates/peer-chaincode/src/deploy.rs
// ============================================================================
// Module: Deployment Dispatcher
// Description: Chaincode instantiation entry points.
// Purpose: Branch between lifecycle protocols and run the legacy flow.
// Dependencies: peer-core, tracing
// ============================================================================

//! ## Overview
//! [`chaincode_deploy`] is the dispatcher entry point. It takes ownership of
//! closing the broadcast client, validates the channel, probes the channel
//! lifecycle version, and dispatches:
//! - legacy channels run `send_init` directly (normally [`lscc_instantiate`]);
//! - config-based channels run [`config_based_lifecycle_update`], which calls
//!   `send_init` after broadcasting the definition.
//!
//! ## Invariants
//! - The broadcast client is closed exactly once per call, on every path.
//! - No network call happens before the channel id is validated.
//! - Nothing is retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use peer_core::ChaincodeDeploymentSpec;
use peer_core::ChaincodeInput;
use peer_core::ChaincodeSpec;
use peer_core::ChannelProtocolVersion;
use peer_core::Envelope;

use crate::error::DeployError;
use crate::guard::BroadcastGuard;
use crate::lifecycle::config_based_lifecycle_update;
use crate::probe::fetch_channel_config;
use crate::proposals::create_deploy_proposal;
use crate::proposals::create_signed_tx;
use crate::proposals::sign_proposal;
use crate::request::DeployContext;
use crate::request::InstantiateRequest;

// ============================================================================
// SECTION: Dispatcher
// ============================================================================

/// Deploys chaincode on the request's channel.
///
/// `send_init` performs the instantiate step; it runs directly on legacy
/// channels and after the definition update on config-based channels.
///
/// # Errors
///
/// Returns [`DeployError::MissingChannel`] for an empty channel id,
/// [`DeployError::VersionProbe`] when the channel config cannot be fetched,
/// and any error from the selected flow.
pub fn chaincode_deploy<F>(
    ctx: &DeployContext,
    request: &InstantiateRequest,
    send_init: F,
) -> Result<(), DeployError>
where
    F: FnOnce(&DeployContext) -> Result<(), DeployError>,
{
    let _guard = BroadcastGuard::new(ctx.broadcast.as_ref());
    if request.channel_id.is_empty() {
        return Err(DeployError::MissingChannel);
    }

    let config = fetch_channel_config(ctx, &request.channel_id)?;
    let version = config.protocol_version();
    tracing::info!(
        channel = %request.channel_id,
        chaincode = %request.name,
        version = version.as_str(),
        "dispatching chaincode deployment"
    );
    match version {
        ChannelProtocolVersion::Legacy => send_init(ctx),
        ChannelProtocolVersion::V1_1 => {
            config_based_lifecycle_update(ctx, request, &config, send_init)
        }
    }
}

// ============================================================================
// SECTION: Legacy Instantiate
// ============================================================================

/// Builds the chaincode spec for a request.
fn chaincode_spec(request: &InstantiateRequest) -> Result<ChaincodeSpec, DeployError> {
    if request.name.as_str().is_empty() {
        return Err(DeployError::ChaincodeSpec("chaincode name must be set".to_string()));
    }
    if request.version.is_empty() {
        return Err(DeployError::ChaincodeSpec("chaincode version must be set".to_string()));
    }
    let input = ChaincodeInput::from_ctor_json(&request.constructor)
        .map_err(|err| DeployError::ChaincodeSpec(err.to_string()))?;
    Ok(ChaincodeSpec {
        language: request.language,
        name: request.name.clone(),
        version: request.version.clone(),
        input,
    })
}

/// Builds, signs, and endorses the deploy proposal.
///
/// Returns `Ok(None)` when the endorser produced no response.
///
/// # Errors
///
/// Returns the [`DeployError`] variant naming the failed step.
pub fn instantiate(
    ctx: &DeployContext,
    request: &InstantiateRequest,
) -> Result<Option<Envelope>, DeployError> {
    let spec = chaincode_spec(request)?;
    let deployment_spec = ChaincodeDeploymentSpec {
        chaincode_spec: spec,
        code_package: Vec::new(),
    };
    let deployment_spec_bytes = deployment_spec
        .to_bytes()
        .map_err(|err| DeployError::DeploymentSpec(err.to_string()))?;

    let creator = ctx.signer.serialize().map_err(|err| DeployError::SerializeIdentity {
        identity: ctx.signer.identifier(),
        reason: err.to_string(),
    })?;
    let proposal = create_deploy_proposal(
        &request.channel_id,
        &deployment_spec_bytes,
        creator,
        &request.policy,
        &request.escc,
        &request.vscc,
    )?;
    let signed = sign_proposal(&proposal, ctx.signer.as_ref())?;

    let response = ctx
        .endorser
        .process_proposal(&ctx.request_ctx, &signed)
        .map_err(|err| DeployError::Endorse(err.to_string()))?;
    let Some(response) = response else {
        tracing::info!(
            channel = %request.channel_id,
            tx_id = %proposal.header.channel_header.tx_id,
            "endorser returned no response; nothing to broadcast"
        );
        return Ok(None);
    };

    let envelope = create_signed_tx(&signed, ctx.signer.as_ref(), std::slice::from_ref(&response))?;
    tracing::debug!(tx_id = %proposal.header.channel_header.tx_id, "assembled deploy transaction");
    Ok(Some(envelope))
}

/// Instantiates through the lifecycle system chaincode and broadcasts.
///
/// # Errors
///
/// Returns errors from [`instantiate`] and [`DeployError::Broadcast`] when the
/// envelope cannot be sent.
pub fn lscc_instantiate(
    ctx: &DeployContext,
    request: &InstantiateRequest,
) -> Result<(), DeployError> {
    let Some(envelope) = instantiate(ctx, request)? else {
        return Ok(());
    };
    ctx.broadcast.send(&envelope).map_err(|err| DeployError::Broadcast(err.to_string()))?;
    tracing::info!(
        channel = %request.channel_id,
        chaincode = %request.name,
        version = %request.version,
        "chaincode instantiate transaction broadcast"
    );
    Ok(())
}
