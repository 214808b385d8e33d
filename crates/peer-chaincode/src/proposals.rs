// crates/peer-chaincode/src/proposals.rs
// ============================================================================
// Module: Proposal Construction
// Description: Builders for deploy, query, and config-update messages.
// Purpose: Produce signed protocol messages bound to the creator identity.
// Dependencies: peer-core, rand
// ============================================================================

//! ## Overview
//! Every message built here carries a fresh random nonce and a transaction id
//! computed as `sha256(nonce || creator)`, so endorsers can bind the id to the
//! creator. Deploy proposals target the lifecycle system chaincode; channel
//! configuration queries target the configuration system chaincode.
//!
//! [`create_signed_tx`] turns an endorsed proposal into a broadcastable
//! [`Envelope`] after checking every response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use peer_core::ChaincodeDefinition;
use peer_core::ChaincodeInput;
use peer_core::ChaincodeName;
use peer_core::ChannelConfig;
use peer_core::ChannelHeader;
use peer_core::ChannelId;
use peer_core::ConfigSignature;
use peer_core::ConfigUpdate;
use peer_core::ConfigUpdateEnvelope;
use peer_core::Envelope;
use peer_core::Header;
use peer_core::HeaderType;
use peer_core::Payload;
use peer_core::Proposal;
use peer_core::ProposalResponse;
use peer_core::SignatureHeader;
use peer_core::SignedProposal;
use peer_core::SigningIdentity;
use peer_core::TransactionAction;
use peer_core::TxId;
use peer_core::core::hashing::canonical_json_bytes;
use peer_core::core::hashing::hash_bytes;
use peer_core::now_unix_millis;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::DeployError;
use crate::request::InstantiateRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lifecycle system chaincode.
pub const LSCC: &str = "lscc";
/// Configuration system chaincode.
pub const CSCC: &str = "cscc";
/// Lifecycle function deploying a chaincode.
pub const LSCC_DEPLOY_FUNCTION: &str = "deploy";
/// Configuration function returning the channel configuration.
pub const CSCC_GET_CHANNEL_CONFIG: &str = "GetChannelConfig";
/// Nonce length in bytes.
pub const NONCE_LEN: usize = 24;

// ============================================================================
// SECTION: Headers
// ============================================================================

/// Returns a fresh random nonce.
fn new_nonce() -> Result<Vec<u8>, rand::Error> {
    let mut nonce = vec![0_u8; NONCE_LEN];
    OsRng.try_fill_bytes(&mut nonce)?;
    Ok(nonce)
}

/// Builds a header for `creator` with a fresh nonce and derived tx id.
fn new_header(
    header_type: HeaderType,
    channel_id: &ChannelId,
    chaincode_name: Option<ChaincodeName>,
    creator: Vec<u8>,
) -> Result<Header, rand::Error> {
    let nonce = new_nonce()?;
    let tx_id = TxId::compute(&nonce, &creator);
    Ok(Header {
        channel_header: ChannelHeader {
            header_type,
            channel_id: channel_id.clone(),
            tx_id,
            timestamp_ms: now_unix_millis(),
            chaincode_name,
        },
        signature_header: SignatureHeader {
            creator,
            nonce,
        },
    })
}

/// Builds an endorser proposal invoking `chaincode` with `args`.
fn endorser_proposal(
    channel_id: &ChannelId,
    chaincode: &str,
    args: Vec<String>,
    creator: Vec<u8>,
) -> Result<Proposal, rand::Error> {
    let chaincode_name = ChaincodeName::new(chaincode);
    let header = new_header(
        HeaderType::EndorserTransaction,
        channel_id,
        Some(chaincode_name.clone()),
        creator,
    )?;
    Ok(Proposal {
        header,
        chaincode_name,
        input: ChaincodeInput::new(args),
    })
}

// ============================================================================
// SECTION: Proposals
// ============================================================================

/// Creates the lifecycle deploy proposal for encoded deployment spec bytes.
///
/// Arguments are `deploy`, channel, deployment spec, policy, escc, vscc.
///
/// # Errors
///
/// Returns [`DeployError::CreateProposal`] when the spec bytes are not text or
/// no nonce can be drawn.
pub fn create_deploy_proposal(
    channel_id: &ChannelId,
    deployment_spec: &[u8],
    creator: Vec<u8>,
    policy: &str,
    escc: &str,
    vscc: &str,
) -> Result<Proposal, DeployError> {
    let spec_text = std::str::from_utf8(deployment_spec)
        .map_err(|err| DeployError::CreateProposal(err.to_string()))?;
    let args = vec![
        LSCC_DEPLOY_FUNCTION.to_string(),
        channel_id.to_string(),
        spec_text.to_string(),
        policy.to_string(),
        escc.to_string(),
        vscc.to_string(),
    ];
    endorser_proposal(channel_id, LSCC, args, creator)
        .map_err(|err| DeployError::CreateProposal(format!("nonce generation failed: {err}")))
}

/// Creates the channel configuration query proposal.
///
/// # Errors
///
/// Returns [`DeployError::VersionProbe`] when no nonce can be drawn.
pub fn create_config_query_proposal(
    channel_id: &ChannelId,
    creator: Vec<u8>,
) -> Result<Proposal, DeployError> {
    let args = vec![CSCC_GET_CHANNEL_CONFIG.to_string(), channel_id.to_string()];
    endorser_proposal(channel_id, CSCC, args, creator)
        .map_err(|err| DeployError::VersionProbe(format!("nonce generation failed: {err}")))
}

/// Signs a proposal with `signer`.
///
/// # Errors
///
/// Returns [`DeployError::SignProposal`] when encoding or signing fails.
pub fn sign_proposal(
    proposal: &Proposal,
    signer: &dyn SigningIdentity,
) -> Result<SignedProposal, DeployError> {
    let proposal_bytes =
        proposal.to_bytes().map_err(|err| DeployError::SignProposal(err.to_string()))?;
    let signature =
        signer.sign(&proposal_bytes).map_err(|err| DeployError::SignProposal(err.to_string()))?;
    Ok(SignedProposal {
        proposal_bytes,
        signature,
    })
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

/// Assembles a signed transaction envelope from endorsed responses.
///
/// # Errors
///
/// Returns [`DeployError::AssembleTx`] when there are no responses, any
/// response failed or lacks an endorsement, the response payloads differ, or
/// `signer` is not the proposal creator.
pub fn create_signed_tx(
    signed: &SignedProposal,
    signer: &dyn SigningIdentity,
    responses: &[ProposalResponse],
) -> Result<Envelope, DeployError> {
    let Some(first) = responses.first() else {
        return Err(DeployError::AssembleTx(
            "at least one proposal response is required".to_string(),
        ));
    };
    let proposal = signed.proposal().map_err(|err| DeployError::AssembleTx(err.to_string()))?;

    let creator = signer.serialize().map_err(|err| DeployError::AssembleTx(err.to_string()))?;
    if creator != proposal.header.signature_header.creator {
        return Err(DeployError::AssembleTx(
            "signer must be the same as the one referenced in the header".to_string(),
        ));
    }

    let mut endorsements = Vec::with_capacity(responses.len());
    for response in responses {
        if !response.status.is_success() {
            return Err(DeployError::AssembleTx(format!(
                "proposal response was not successful, error code {}, msg {}",
                response.status.0, response.message
            )));
        }
        if response.payload != first.payload {
            return Err(DeployError::AssembleTx(
                "proposal response payloads do not match".to_string(),
            ));
        }
        let Some(endorsement) = &response.endorsement else {
            return Err(DeployError::AssembleTx(
                "proposal response carries no endorsement".to_string(),
            ));
        };
        endorsements.push(endorsement.clone());
    }

    let action = TransactionAction {
        proposal_hash: hash_bytes(&signed.proposal_bytes),
        response_payload: first.payload.clone(),
        endorsements,
    };
    let payload = Payload {
        header: proposal.header,
        data: action.to_bytes().map_err(|err| DeployError::AssembleTx(err.to_string()))?,
    };
    let payload_bytes = payload.to_bytes().map_err(|err| DeployError::AssembleTx(err.to_string()))?;
    let signature =
        signer.sign(&payload_bytes).map_err(|err| DeployError::AssembleTx(err.to_string()))?;
    Ok(Envelope {
        payload: payload_bytes,
        signature,
    })
}

// ============================================================================
// SECTION: Config Updates
// ============================================================================

/// Wraps a failure while building a config update.
fn update_failed(err: impl fmt::Display) -> DeployError {
    DeployError::LifecycleUpdate(err.to_string())
}

/// Builds the chaincode definition a config-based update writes.
#[must_use]
pub fn chaincode_definition(request: &InstantiateRequest) -> ChaincodeDefinition {
    ChaincodeDefinition {
        name: request.name.clone(),
        version: request.version.clone(),
        endorsement_plugin: request.escc.clone(),
        validation_plugin: request.vscc.clone(),
        endorsement_policy: request.policy.as_bytes().to_vec(),
    }
}

/// Builds and signs a config-update envelope writing the chaincode definition.
///
/// The update is computed against `config.sequence`. The config signature
/// covers the canonical signature header followed by the update bytes.
///
/// # Errors
///
/// Returns [`DeployError::SerializeIdentity`] when the creator cannot be
/// serialized and [`DeployError::LifecycleUpdate`] for any other failure.
pub fn create_config_update_envelope(
    request: &InstantiateRequest,
    config: &ChannelConfig,
    signer: &dyn SigningIdentity,
) -> Result<Envelope, DeployError> {
    let creator = signer.serialize().map_err(|err| DeployError::SerializeIdentity {
        identity: signer.identifier(),
        reason: err.to_string(),
    })?;

    let update = ConfigUpdate {
        channel_id: request.channel_id.clone(),
        read_sequence: config.sequence,
        write_set: BTreeMap::from([(request.name.clone(), chaincode_definition(request))]),
    };
    let update_bytes = update.to_bytes().map_err(update_failed)?;

    let signature_header = SignatureHeader {
        creator: creator.clone(),
        nonce: new_nonce().map_err(update_failed)?,
    };
    let mut signed_material = canonical_json_bytes(&signature_header).map_err(update_failed)?;
    signed_material.extend_from_slice(&update_bytes);
    let config_signature = signer.sign(&signed_material).map_err(update_failed)?;

    let update_envelope = ConfigUpdateEnvelope {
        config_update: update_bytes,
        signatures: vec![ConfigSignature {
            signature_header,
            signature: config_signature,
        }],
    };
    let header = new_header(HeaderType::ConfigUpdate, &request.channel_id, None, creator)
        .map_err(update_failed)?;
    let payload = Payload {
        header,
        data: update_envelope.to_bytes().map_err(update_failed)?,
    };
    let payload_bytes = payload.to_bytes().map_err(update_failed)?;
    let signature = signer.sign(&payload_bytes).map_err(update_failed)?;
    Ok(Envelope {
        payload: payload_bytes,
        signature,
    })
}
