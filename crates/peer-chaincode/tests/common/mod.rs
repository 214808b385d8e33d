// crates/peer-chaincode/tests/common/mod.rs
// ============================================================================
// Module: Dispatcher Test Doubles
// Description: Scripted endorser and counting broadcast client.
// ============================================================================
//! ## Overview
//! Test doubles for the deployment dispatcher. The endorser replays scripted
//! answers in order and records every proposal; the broadcast client counts
//! sends and closes.

#![allow(dead_code, reason = "Each test binary uses a subset of the fixtures.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only fixtures may panic on setup failures."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use peer_chaincode::DeployContext;
use peer_chaincode::InstantiateRequest;
use peer_core::BroadcastClient;
use peer_core::ChaincodeName;
use peer_core::ChannelConfig;
use peer_core::ChannelId;
use peer_core::ClientError;
use peer_core::Ed25519Identity;
use peer_core::Endorsement;
use peer_core::EndorserClient;
use peer_core::Envelope;
use peer_core::MspId;
use peer_core::Proposal;
use peer_core::ProposalResponse;
use peer_core::RequestContext;
use peer_core::ResponseStatus;
use peer_core::SignedProposal;
use peer_core::V1_1_CAPABILITY;

// ============================================================================
// SECTION: Endorser
// ============================================================================

/// Endorser replaying scripted answers in order.
#[derive(Default)]
pub struct ScriptedEndorser {
    answers: Mutex<VecDeque<Result<Option<ProposalResponse>, ClientError>>>,
    seen: Mutex<Vec<Proposal>>,
}

impl ScriptedEndorser {
    pub fn new(answers: Vec<Result<Option<ProposalResponse>, ClientError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<Proposal> {
        self.seen.lock().unwrap().clone()
    }
}

impl EndorserClient for ScriptedEndorser {
    fn process_proposal(
        &self,
        ctx: &RequestContext,
        proposal: &SignedProposal,
    ) -> Result<Option<ProposalResponse>, ClientError> {
        if ctx.is_done() {
            return Err(ClientError::Cancelled);
        }
        self.seen.lock().unwrap().push(proposal.proposal().unwrap());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted answer".to_string())))
    }
}

// ============================================================================
// SECTION: Broadcast
// ============================================================================

/// Broadcast client counting sends and closes.
#[derive(Default)]
pub struct CountingBroadcast {
    sent: Mutex<Vec<Envelope>>,
    closes: AtomicUsize,
    fail_send: AtomicBool,
    fail_close: AtomicBool,
}

impl CountingBroadcast {
    pub fn failing_send() -> Self {
        let client = Self::default();
        client.fail_send.store(true, Ordering::SeqCst);
        client
    }

    pub fn failing_close() -> Self {
        let client = Self::default();
        client.fail_close.store(true, Ordering::SeqCst);
        client
    }

    pub fn sent(&self) -> Vec<Envelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl BroadcastClient for CountingBroadcast {
    fn send(&self, envelope: &Envelope) -> Result<(), ClientError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("orderer unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(envelope.clone());
        Ok(())
    }

    fn close(&self) -> Result<(), ClientError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("close failed".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Test harness bundling the context with handles to its doubles.
pub struct Harness {
    pub ctx: DeployContext,
    pub endorser: Arc<ScriptedEndorser>,
    pub broadcast: Arc<CountingBroadcast>,
    pub signer: Arc<Ed25519Identity>,
}

pub fn signer() -> Arc<Ed25519Identity> {
    Arc::new(Ed25519Identity::from_secret_bytes(MspId::new("Org1MSP"), &[9; 32]))
}

pub fn harness(
    answers: Vec<Result<Option<ProposalResponse>, ClientError>>,
    broadcast: CountingBroadcast,
) -> Harness {
    let signer = signer();
    let endorser = Arc::new(ScriptedEndorser::new(answers));
    let broadcast = Arc::new(broadcast);
    let ctx = DeployContext::new(signer.clone(), endorser.clone(), broadcast.clone());
    Harness {
        ctx,
        endorser,
        broadcast,
        signer,
    }
}

pub fn channel_config(channel: &str, config_based: bool) -> ChannelConfig {
    let mut capabilities = BTreeSet::new();
    if config_based {
        capabilities.insert(V1_1_CAPABILITY.to_string());
    }
    ChannelConfig {
        channel_id: ChannelId::new(channel),
        sequence: 4,
        application_capabilities: capabilities,
        chaincodes: BTreeMap::new(),
    }
}

pub fn config_answer(
    channel: &str,
    config_based: bool,
) -> Result<Option<ProposalResponse>, ClientError> {
    Ok(Some(ProposalResponse {
        status: ResponseStatus::SUCCESS,
        message: String::new(),
        payload: serde_json::to_vec(&channel_config(channel, config_based)).unwrap(),
        endorsement: None,
    }))
}

pub fn endorsed_answer() -> Result<Option<ProposalResponse>, ClientError> {
    Ok(Some(ProposalResponse {
        status: ResponseStatus::SUCCESS,
        message: String::new(),
        payload: b"deployed".to_vec(),
        endorsement: Some(Endorsement {
            endorser: b"peer0".to_vec(),
            signature: vec![1, 2, 3],
        }),
    }))
}

pub fn request(channel: &str) -> InstantiateRequest {
    let mut request =
        InstantiateRequest::new(ChannelId::new(channel), ChaincodeName::new("mycc"), "1.0");
    request.constructor = r#"{"Args":["init","a","100"]}"#.to_string();
    request.policy = "AND('Org1MSP.member')".to_string();
    request
}
