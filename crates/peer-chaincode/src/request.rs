// crates/peer-chaincode/src/request.rs
// ============================================================================
// Module: Deployment Requests
// Description: Instantiate parameters and the collaborators a deployment uses.
// Purpose: Carry caller input and clients through the dispatcher.
// Dependencies: peer-core
// ============================================================================

//! ## Overview
//! [`InstantiateRequest`] is the caller's input; [`DeployContext`] bundles the
//! signing identity and the network clients. The signing identity is shared
//! read-only, so one context can serve concurrent deployments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use peer_core::BroadcastClient;
use peer_core::ChaincodeLanguage;
use peer_core::ChaincodeName;
use peer_core::ChannelId;
use peer_core::EndorserClient;
use peer_core::RequestContext;
use peer_core::SigningIdentity;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default endorsement system chaincode.
pub const DEFAULT_ESCC: &str = "escc";
/// Default validation system chaincode.
pub const DEFAULT_VSCC: &str = "vscc";

// ============================================================================
// SECTION: Request
// ============================================================================

/// Parameters of one chaincode instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiateRequest {
    /// Target channel.
    pub channel_id: ChannelId,
    /// Chaincode name.
    pub name: ChaincodeName,
    /// Chaincode version label.
    pub version: String,
    /// Implementation language.
    pub language: ChaincodeLanguage,
    /// Constructor message as JSON, e.g. `{"Args":["init","a","100"]}`.
    pub constructor: String,
    /// Endorsement policy expression.
    pub policy: String,
    /// Endorsement system chaincode name.
    pub escc: String,
    /// Validation system chaincode name.
    pub vscc: String,
    /// Where to save a signed config-update envelope instead of broadcasting.
    pub resource_envelope_save_path: Option<PathBuf>,
    /// Where to load a previously signed config-update envelope from.
    pub resource_envelope_load_path: Option<PathBuf>,
}

impl InstantiateRequest {
    /// Creates a request with default language, constructor, and plugins.
    #[must_use]
    pub fn new(channel_id: ChannelId, name: ChaincodeName, version: impl Into<String>) -> Self {
        Self {
            channel_id,
            name,
            version: version.into(),
            language: ChaincodeLanguage::default(),
            constructor: "{}".to_string(),
            policy: String::new(),
            escc: DEFAULT_ESCC.to_string(),
            vscc: DEFAULT_VSCC.to_string(),
            resource_envelope_save_path: None,
            resource_envelope_load_path: None,
        }
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Collaborators used by one deployment attempt.
#[derive(Clone)]
pub struct DeployContext {
    /// Identity signing proposals and envelopes.
    pub signer: Arc<dyn SigningIdentity>,
    /// Endorsement client.
    pub endorser: Arc<dyn EndorserClient>,
    /// Ordering service client; closed when the attempt ends.
    pub broadcast: Arc<dyn BroadcastClient>,
    /// Cancellation and deadline for network calls.
    pub request_ctx: RequestContext,
}

impl DeployContext {
    /// Creates a context with a background request context.
    #[must_use]
    pub fn new(
        signer: Arc<dyn SigningIdentity>,
        endorser: Arc<dyn EndorserClient>,
        broadcast: Arc<dyn BroadcastClient>,
    ) -> Self {
        Self {
            signer,
            endorser,
            broadcast,
            request_ctx: RequestContext::background(),
        }
    }

    /// Replaces the request context.
    #[must_use]
    pub fn with_request_context(mut self, request_ctx: RequestContext) -> Self {
        self.request_ctx = request_ctx;
        self
    }
}

impl fmt::Debug for DeployContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployContext")
            .field("signer", &self.signer.identifier())
            .field("request_ctx", &self.request_ctx)
            .finish_non_exhaustive()
    }
}
