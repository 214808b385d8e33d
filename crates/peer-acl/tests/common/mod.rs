// crates/peer-acl/tests/common/mod.rs
// ============================================================================
// Module: ACL Test Fixtures
// Description: Signed proposal and signed data builders for ACL tests.
// ============================================================================
//! ## Overview
//! Builds correctly signed identity material so tests can tamper with one
//! field at a time.

#![allow(dead_code, reason = "Each test binary uses a subset of the fixtures.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures may panic on setup failures."
)]

use std::collections::BTreeMap;

use peer_core::ChaincodeInput;
use peer_core::ChaincodeName;
use peer_core::ChannelHeader;
use peer_core::ChannelId;
use peer_core::ConfigUpdate;
use peer_core::ConfigUpdateEnvelope;
use peer_core::Ed25519Identity;
use peer_core::Envelope;
use peer_core::Header;
use peer_core::HeaderType;
use peer_core::MspId;
use peer_core::Payload;
use peer_core::Proposal;
use peer_core::SerializedIdentity;
use peer_core::SignatureHeader;
use peer_core::SignedData;
use peer_core::SignedProposal;
use peer_core::SigningIdentity;
use peer_core::TxId;

/// Deterministic identity for tests.
pub fn identity(seed: u8) -> Ed25519Identity {
    Ed25519Identity::from_secret_bytes(MspId::new("Org1MSP"), &[seed; 32])
}

/// Builds an unsigned endorser proposal for `channel`.
pub fn proposal(signer: &Ed25519Identity, channel: &str) -> Proposal {
    let creator = signer.serialize().unwrap();
    let nonce = vec![7_u8; 24];
    Proposal {
        header: Header {
            channel_header: ChannelHeader {
                header_type: HeaderType::EndorserTransaction,
                channel_id: ChannelId::new(channel),
                tx_id: TxId::compute(&nonce, &creator),
                timestamp_ms: 1_700_000_000_000,
                chaincode_name: Some(ChaincodeName::new("mycc")),
            },
            signature_header: SignatureHeader {
                creator,
                nonce,
            },
        },
        chaincode_name: ChaincodeName::new("mycc"),
        input: ChaincodeInput::new(["invoke", "a"]),
    }
}

/// Signs `proposal` with `signer`.
pub fn sign(signer: &Ed25519Identity, proposal: &Proposal) -> SignedProposal {
    let proposal_bytes = proposal.to_bytes().unwrap();
    let signature = signer.sign(&proposal_bytes).unwrap();
    SignedProposal {
        proposal_bytes,
        signature,
    }
}

/// Builds a correctly signed proposal for `channel`.
pub fn signed_proposal(seed: u8, channel: &str) -> SignedProposal {
    let signer = identity(seed);
    sign(&signer, &proposal(&signer, channel))
}

/// Builds one correctly signed data item.
pub fn signed_data(seed: u8, data: &[u8]) -> SignedData {
    let signer = identity(seed);
    SignedData {
        data: data.to_vec(),
        identity: signer.serialize().unwrap(),
        signature: signer.sign(data).unwrap(),
    }
}

/// Serialized identity whose public key is the curve identity point.
pub fn small_order_creator() -> Vec<u8> {
    let mut id_bytes = vec![0_u8; 32];
    id_bytes[0] = 1;
    SerializedIdentity {
        msp_id: MspId::new("Org1MSP"),
        id_bytes,
    }
    .to_bytes()
    .unwrap()
}

/// Signature that satisfies the cofactored equation for a small-order key
/// over any message.
pub fn small_order_signature() -> Vec<u8> {
    let mut signature = vec![0_u8; 64];
    signature[0] = 1;
    signature
}

/// Builds a signed config update envelope whose header names `channel` and
/// whose update targets `update_channel`.
pub fn config_update_envelope(channel: &str, update_channel: &str) -> Envelope {
    let signer = identity(1);
    let mut header = proposal(&signer, channel).header;
    header.channel_header.header_type = HeaderType::ConfigUpdate;
    header.channel_header.chaincode_name = None;
    let update = ConfigUpdate {
        channel_id: ChannelId::new(update_channel),
        read_sequence: 3,
        write_set: BTreeMap::new(),
    };
    let update_envelope = ConfigUpdateEnvelope {
        config_update: update.to_bytes().unwrap(),
        signatures: Vec::new(),
    };
    let payload = Payload {
        header,
        data: update_envelope.to_bytes().unwrap(),
    }
    .to_bytes()
    .unwrap();
    let signature = signer.sign(&payload).unwrap();
    Envelope {
        payload,
        signature,
    }
}
