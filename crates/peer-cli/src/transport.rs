// crates/peer-cli/src/transport.rs
// ============================================================================
// Module: HTTP Transport
// Description: Blocking HTTP clients for the endorser and ordering service.
// Purpose: Carry signed proposals and envelopes as JSON over HTTP.
// Dependencies: peer-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`HttpEndorserClient`] posts a signed proposal to `{base}/v1/proposals` and
//! [`HttpBroadcastClient`] posts envelopes to `{base}/v1/broadcast`. Bodies
//! are JSON encodings of the peer-core message types.
//!
//! ## Invariants
//! - Redirects are never followed.
//! - Response bodies are read with a hard size limit.
//! - A cancelled or expired request context never reaches the network.
//! - `204 No Content` from the endorser means "no response", not failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use peer_core::BroadcastClient;
use peer_core::ClientError;
use peer_core::EndorserClient;
use peer_core::Envelope;
use peer_core::ProposalResponse;
use peer_core::RequestContext;
use peer_core::SignedProposal;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Endorsement endpoint path.
pub const PROPOSALS_PATH: &str = "v1/proposals";
/// Ordering endpoint path.
pub const BROADCAST_PATH: &str = "v1/broadcast";
/// User agent sent with every request.
const USER_AGENT: &str = concat!("peer-cli/", env!("CARGO_PKG_VERSION"));
/// Maximum bytes of a rejection body kept in error messages.
const MAX_ERROR_BODY_CHARS: usize = 512;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Transport limits shared by both clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout when the context sets no deadline.
    pub request_timeout: Duration,
    /// Maximum response body size.
    pub max_response_bytes: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Builds the blocking client used by both transports.
fn build_client(config: &HttpTransportConfig) -> Result<Client, ClientError> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .user_agent(USER_AGENT)
        .redirect(Policy::none())
        .build()
        .map_err(|err| ClientError::Transport(format!("http client build failed: {err}")))
}

/// Joins `path` onto `base`, treating `base` as a directory.
fn endpoint(base: &Url, path: &str) -> Result<Url, ClientError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path).map_err(|err| ClientError::Transport(format!("invalid endpoint url: {err}")))
}

/// Per-request timeout honoring the context deadline.
fn request_timeout(ctx: &RequestContext, fallback: Duration) -> Result<Duration, ClientError> {
    if ctx.is_done() {
        return Err(ClientError::Cancelled);
    }
    Ok(ctx.remaining().map_or(fallback, |remaining| remaining.min(fallback)))
}

// ============================================================================
// SECTION: Endorser Client
// ============================================================================

/// Endorser reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpEndorserClient {
    /// Underlying client.
    client: Client,
    /// Fully resolved endorsement endpoint.
    endpoint: Url,
    /// Transport limits.
    config: HttpTransportConfig,
}

impl HttpEndorserClient {
    /// Creates a client for the endorser at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the client cannot be built.
    pub fn new(base: &Url, config: HttpTransportConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(&config)?,
            endpoint: endpoint(base, PROPOSALS_PATH)?,
            config,
        })
    }

    /// Returns the endorsement endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl EndorserClient for HttpEndorserClient {
    fn process_proposal(
        &self,
        ctx: &RequestContext,
        proposal: &SignedProposal,
    ) -> Result<Option<ProposalResponse>, ClientError> {
        let timeout = request_timeout(ctx, self.config.request_timeout)?;
        let body = serde_json::to_vec(proposal)
            .map_err(|err| ClientError::Transport(format!("proposal encoding failed: {err}")))?;
        let mut response = self
            .client
            .post(self.endpoint.clone())
            .timeout(timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| transport_error(ctx, &err))?;
        let status = response.status();
        tracing::debug!(endpoint = %self.endpoint, status = status.as_u16(), "endorser answered");
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = read_response_limited(&mut response, self.config.max_response_bytes)?;
        if !status.is_success() {
            return Err(rejected(status, &bytes));
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| ClientError::InvalidResponse(format!("proposal response: {err}")))
    }
}

// ============================================================================
// SECTION: Broadcast Client
// ============================================================================

/// Ordering service reached over HTTP.
#[derive(Debug)]
pub struct HttpBroadcastClient {
    /// Underlying client.
    client: Client,
    /// Fully resolved broadcast endpoint.
    endpoint: Url,
    /// Transport limits.
    config: HttpTransportConfig,
    /// Set once the client is closed.
    closed: AtomicBool,
}

impl HttpBroadcastClient {
    /// Creates a client for the ordering service at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the client cannot be built.
    pub fn new(base: &Url, config: HttpTransportConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(&config)?,
            endpoint: endpoint(base, BROADCAST_PATH)?,
            config,
            closed: AtomicBool::new(false),
        })
    }

    /// Returns true once [`BroadcastClient::close`] ran.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl BroadcastClient for HttpBroadcastClient {
    fn send(&self, envelope: &Envelope) -> Result<(), ClientError> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        let body = serde_json::to_vec(envelope)
            .map_err(|err| ClientError::Transport(format!("envelope encoding failed: {err}")))?;
        let mut response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(endpoint = %self.endpoint, "envelope accepted for ordering");
            return Ok(());
        }
        let bytes = read_response_limited(&mut response, self.config.max_response_bytes)?;
        Err(rejected(status, &bytes))
    }

    fn close(&self) -> Result<(), ClientError> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!(endpoint = %self.endpoint, "broadcast client closed");
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a send failure, preferring `Cancelled` when the deadline caused it.
fn transport_error(ctx: &RequestContext, err: &reqwest::Error) -> ClientError {
    if err.is_timeout() && ctx.is_done() {
        return ClientError::Cancelled;
    }
    ClientError::Transport(err.to_string())
}

/// Builds a rejection error with a truncated body excerpt.
fn rejected(status: StatusCode, body: &[u8]) -> ClientError {
    let message: String =
        String::from_utf8_lossy(body).chars().take(MAX_ERROR_BODY_CHARS).collect();
    ClientError::Rejected {
        status: status.as_u16(),
        message,
    }
}

/// Reads a response body with a hard size limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, ClientError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| ClientError::InvalidResponse("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(ClientError::InvalidResponse("response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    response
        .take(max_bytes_u64.saturating_add(1))
        .read_to_end(&mut buf)
        .map_err(|err| ClientError::Transport(format!("failed to read response: {err}")))?;
    if buf.len() > max_bytes {
        return Err(ClientError::InvalidResponse("response exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len
        && u64::try_from(buf.len()).unwrap_or(u64::MAX) < expected
    {
        return Err(ClientError::InvalidResponse("response truncated".to_string()));
    }
    Ok(buf)
}
