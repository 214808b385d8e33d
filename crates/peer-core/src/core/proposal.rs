// crates/peer-core/src/core/proposal.rs
// ============================================================================
// Module: Proposal and Transaction Messages
// Description: Chaincode specs, proposals, responses, and envelopes.
// Purpose: Define the wire shapes exchanged with endorsers and orderers.
// Dependencies: serde, serde_json, serde_jcs
// ============================================================================

//! ## Overview
//! Messages mirror the endorsement flow: a [`Proposal`] (header plus chaincode
//! invocation) is serialized canonically and signed into a
//! [`SignedProposal`]; endorsers answer with a [`ProposalResponse`]; the
//! client assembles endorsed results into a signed [`Envelope`] for the
//! ordering service. Config updates travel in the same [`Envelope`] with a
//! [`HeaderType::ConfigUpdate`] header.
//!
//! Security posture: decoded messages are untrusted; every decode path returns
//! [`ProtocolError`] instead of panicking.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::core::channel::ChaincodeDefinition;
use crate::core::hashing::HashDigest;
use crate::core::hashing::canonical_json_bytes;
use crate::core::identifiers::ChaincodeName;
use crate::core::identifiers::ChannelId;
use crate::core::identifiers::TxId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Protocol message encoding and decoding errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message could not be encoded.
    #[error("message encoding failed: {0}")]
    Encode(String),
    /// Message bytes could not be decoded.
    #[error("message decoding failed: {0}")]
    Decode(String),
    /// Caller-supplied input is invalid.
    #[error("invalid input: {0}")]
    Input(String),
}

/// Encodes a message as canonical JSON bytes.
fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    canonical_json_bytes(value).map_err(|err| ProtocolError::Encode(err.to_string()))
}

/// Decodes a message from JSON bytes.
fn decode<T: DeserializeOwned>(kind: &str, bytes: &[u8]) -> Result<T, ProtocolError> {
    if bytes.is_empty() {
        return Err(ProtocolError::Decode(format!("empty {kind}")));
    }
    serde_json::from_slice(bytes).map_err(|err| ProtocolError::Decode(format!("{kind}: {err}")))
}

// ============================================================================
// SECTION: Chaincode Specs
// ============================================================================

/// Implementation language of a chaincode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaincodeLanguage {
    /// Go chaincode.
    #[default]
    Golang,
    /// Node.js chaincode.
    Node,
    /// Java chaincode.
    Java,
    /// Pre-built chaincode archive.
    Car,
}

impl ChaincodeLanguage {
    /// Returns the stable language label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Golang => "golang",
            Self::Node => "node",
            Self::Java => "java",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for ChaincodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChaincodeLanguage {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "golang" | "go" => Ok(Self::Golang),
            "node" => Ok(Self::Node),
            "java" => Ok(Self::Java),
            "car" => Ok(Self::Car),
            other => Err(ProtocolError::Input(format!("unsupported chaincode language: {other}"))),
        }
    }
}

/// Constructor or invocation arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChaincodeInput {
    /// Positional arguments; the first is conventionally the function name.
    pub args: Vec<String>,
}

impl ChaincodeInput {
    /// Creates input from positional arguments.
    #[must_use]
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses constructor JSON such as `{"Args":["init","a","100"]}`.
    ///
    /// Keys are matched case-insensitively. A `Function` key, when present,
    /// is prepended to the arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Input`] when the JSON is not an object with a
    /// string array of arguments.
    pub fn from_ctor_json(text: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| ProtocolError::Input(format!("constructor is not valid json: {err}")))?;
        let Value::Object(map) = value else {
            return Err(ProtocolError::Input("constructor must be a json object".to_string()));
        };
        let mut function = None;
        let mut args = Vec::new();
        for (key, entry) in map {
            match key.to_ascii_lowercase().as_str() {
                "function" => {
                    let Value::String(name) = entry else {
                        return Err(ProtocolError::Input(
                            "constructor function must be a string".to_string(),
                        ));
                    };
                    function = Some(name);
                }
                "args" => {
                    let Value::Array(items) = entry else {
                        return Err(ProtocolError::Input(
                            "constructor args must be an array".to_string(),
                        ));
                    };
                    for item in items {
                        let Value::String(arg) = item else {
                            return Err(ProtocolError::Input(
                                "constructor args must be strings".to_string(),
                            ));
                        };
                        args.push(arg);
                    }
                }
                other => {
                    return Err(ProtocolError::Input(format!("unknown constructor field: {other}")));
                }
            }
        }
        if let Some(function) = function {
            args.insert(0, function);
        }
        Ok(Self {
            args,
        })
    }
}

/// Chaincode specification: what to run and with which input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChaincodeSpec {
    /// Implementation language.
    pub language: ChaincodeLanguage,
    /// Chaincode name.
    pub name: ChaincodeName,
    /// Chaincode version label.
    pub version: String,
    /// Constructor or invocation input.
    pub input: ChaincodeInput,
}

/// Deployment specification wrapping a chaincode spec and its code package.
///
/// # Invariants
/// - `code_package` is empty for instantiation; code is installed separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChaincodeDeploymentSpec {
    /// Chaincode specification.
    pub chaincode_spec: ChaincodeSpec,
    /// Code package bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub code_package: Vec<u8>,
}

impl ChaincodeDeploymentSpec {
    /// Encodes the deployment spec as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] when serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }
}

// ============================================================================
// SECTION: Headers
// ============================================================================

/// Transaction header type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderType {
    /// Endorser transaction (chaincode proposal or invocation).
    EndorserTransaction,
    /// Channel configuration update.
    ConfigUpdate,
}

/// Channel-scoped header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelHeader {
    /// Header type.
    pub header_type: HeaderType,
    /// Target channel.
    pub channel_id: ChannelId,
    /// Transaction identifier.
    pub tx_id: TxId,
    /// Creation time in unix milliseconds.
    pub timestamp_ms: u64,
    /// Chaincode targeted by an endorser transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaincode_name: Option<ChaincodeName>,
}

/// Creator and replay-protection fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureHeader {
    /// Serialized creator identity.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub creator: Vec<u8>,
    /// Random nonce.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub nonce: Vec<u8>,
}

/// Full message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Header {
    /// Channel header.
    pub channel_header: ChannelHeader,
    /// Signature header.
    pub signature_header: SignatureHeader,
}

// ============================================================================
// SECTION: Proposals
// ============================================================================

/// Chaincode proposal: header plus the invocation to simulate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Proposal {
    /// Proposal header.
    pub header: Header,
    /// Chaincode being invoked.
    pub chaincode_name: ChaincodeName,
    /// Invocation input.
    pub input: ChaincodeInput,
}

impl Proposal {
    /// Encodes the proposal as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] when serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    /// Decodes a proposal from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] when the bytes are not a proposal.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode("proposal", bytes)
    }
}

/// Serialized proposal plus the creator's signature over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedProposal {
    /// Canonical proposal bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub proposal_bytes: Vec<u8>,
    /// Creator signature over `proposal_bytes`.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub signature: Vec<u8>,
}

impl SignedProposal {
    /// Decodes the embedded proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] when the bytes are empty or malformed.
    pub fn proposal(&self) -> Result<Proposal, ProtocolError> {
        Proposal::from_bytes(&self.proposal_bytes)
    }
}

/// Data, the identity that signed it, and the signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedData {
    /// Signed data bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub data: Vec<u8>,
    /// Serialized signer identity.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub identity: Vec<u8>,
    /// Signature over `data`.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub signature: Vec<u8>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response status code carried by proposal responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseStatus(pub i32);

impl ResponseStatus {
    /// Successful execution.
    pub const SUCCESS: Self = Self(200);
    /// Lowest status treated as an error.
    pub const ERROR_THRESHOLD: Self = Self(400);
    /// Generic failure.
    pub const INTERNAL_ERROR: Self = Self(500);

    /// Returns true for statuses in `[200, 400)`.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= Self::SUCCESS.0 && self.0 < Self::ERROR_THRESHOLD.0
    }
}

/// Endorser signature over a proposal response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endorsement {
    /// Serialized endorser identity.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub endorser: Vec<u8>,
    /// Endorser signature.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub signature: Vec<u8>,
}

/// Endorser answer to a signed proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalResponse {
    /// Execution status.
    pub status: ResponseStatus,
    /// Status message.
    #[serde(default)]
    pub message: String,
    /// Response payload (simulation results or query output).
    #[serde(default, with = "crate::core::encoding::base64_bytes")]
    pub payload: Vec<u8>,
    /// Endorsement, absent for pure queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endorsement: Option<Endorsement>,
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

/// Endorsed action carried inside a transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionAction {
    /// Hash of the canonical proposal bytes that were endorsed.
    pub proposal_hash: HashDigest,
    /// Endorsed response payload.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub response_payload: Vec<u8>,
    /// Collected endorsements.
    pub endorsements: Vec<Endorsement>,
}

impl TransactionAction {
    /// Encodes the action as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] when serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }
}

/// Envelope payload: header plus type-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Payload {
    /// Payload header.
    pub header: Header,
    /// Type-specific data bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub data: Vec<u8>,
}

impl Payload {
    /// Encodes the payload as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] when serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }
}

/// Signed payload submitted to the ordering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Canonical payload bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub payload: Vec<u8>,
    /// Creator signature over `payload`.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub signature: Vec<u8>,
}

impl Envelope {
    /// Decodes the envelope payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] when the payload is malformed.
    pub fn decode_payload(&self) -> Result<Payload, ProtocolError> {
        decode("payload", &self.payload)
    }
}

// ============================================================================
// SECTION: Config Updates
// ============================================================================

/// Requested change to the channel resource tree.
///
/// # Invariants
/// - `read_sequence` is the config sequence the update was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    /// Target channel.
    pub channel_id: ChannelId,
    /// Sequence of the config snapshot the update builds on.
    pub read_sequence: u64,
    /// Chaincode definitions written by the update.
    pub write_set: BTreeMap<ChaincodeName, ChaincodeDefinition>,
}

impl ConfigUpdate {
    /// Encodes the update as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] when serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }
}

/// Signature collected on a config update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSignature {
    /// Signer header (creator and nonce).
    pub signature_header: SignatureHeader,
    /// Signature over the canonical signature header followed by the update bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub signature: Vec<u8>,
}

/// Config update plus collected signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdateEnvelope {
    /// Canonical config update bytes.
    #[serde(with = "crate::core::encoding::base64_bytes")]
    pub config_update: Vec<u8>,
    /// Signatures over the update.
    pub signatures: Vec<ConfigSignature>,
}

impl ConfigUpdateEnvelope {
    /// Encodes the envelope as canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] when serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode(self)
    }

    /// Decodes an envelope from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] when the bytes are malformed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        decode("config update envelope", bytes)
    }

    /// Decodes the embedded config update.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] when the update bytes are malformed.
    pub fn update(&self) -> Result<ConfigUpdate, ProtocolError> {
        decode("config update", &self.config_update)
    }
}
