// crates/peer-cli/src/tests.rs
// ============================================================================
// Module: CLI Library Unit Tests
// Description: Bounded reads, key loading, and endpoint resolution.
// Purpose: Ensure CLI inputs fail closed and endpoints resolve predictably.
// Dependencies: peer-cli, tempfile
// ============================================================================

//! ## Overview
//! Security posture: CLI inputs are untrusted; size limits must fail closed.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use peer_core::SignedProposal;
use peer_core::SigningIdentity;
use url::Url;

use crate::files::MAX_KEY_FILE_BYTES;
use crate::files::ReadLimitError;
use crate::files::load_signed_proposal;
use crate::files::load_signing_identity;
use crate::files::read_bytes_with_limit;
use crate::logging::log_filter;
use crate::transport::HttpEndorserClient;
use crate::transport::HttpTransportConfig;

#[test]
fn read_within_limit_returns_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small.bin");
    fs::write(&path, b"abcd").unwrap();
    assert_eq!(read_bytes_with_limit(&path, 4).unwrap(), b"abcd");
}

#[test]
fn read_over_limit_fails_closed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.bin");
    fs::write(&path, vec![0_u8; 16]).unwrap();
    let err = read_bytes_with_limit(&path, 15).unwrap_err();
    assert!(matches!(err, ReadLimitError::TooLarge { size: 16, limit: 15, .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_bytes_with_limit(&dir.path().join("absent"), 10).unwrap_err();
    assert!(matches!(err, ReadLimitError::Io { .. }));
}

#[test]
fn base64_key_file_loads_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("key.b64");
    fs::write(&path, format!("{}\n", BASE64.encode([9_u8; 32]))).unwrap();
    let identity = load_signing_identity("Org1MSP", &path).unwrap();
    assert!(identity.identifier().contains("Org1MSP"));
    let raw = dir.path().join("key.raw");
    fs::write(&raw, [9_u8; 32]).unwrap();
    let same = load_signing_identity("Org1MSP", &raw).unwrap();
    assert_eq!(identity.serialize().unwrap(), same.serialize().unwrap());
}

#[test]
fn malformed_or_oversized_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let short = dir.path().join("short");
    fs::write(&short, b"not a key").unwrap();
    let result = load_signing_identity("Org1MSP", &short);
    assert!(matches!(result, Err(ReadLimitError::Invalid { .. })));
    let big = dir.path().join("big");
    fs::write(&big, vec![b'A'; MAX_KEY_FILE_BYTES + 1]).unwrap();
    assert!(matches!(load_signing_identity("Org1MSP", &big), Err(ReadLimitError::TooLarge { .. })));
}

#[test]
fn signed_proposal_file_round_trips_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proposal.json");
    let proposal = SignedProposal {
        proposal_bytes: b"{}".to_vec(),
        signature: vec![1, 2, 3],
    };
    fs::write(&path, serde_json::to_vec(&proposal).unwrap()).unwrap();
    assert_eq!(load_signed_proposal(&path).unwrap(), proposal);
    fs::write(&path, b"[]").unwrap();
    assert!(matches!(load_signed_proposal(&path), Err(ReadLimitError::Invalid { .. })));
}

#[test]
fn endpoint_keeps_base_path() {
    let config = HttpTransportConfig::default();
    let bare_url = Url::parse("http://127.0.0.1:7051").unwrap();
    let bare = HttpEndorserClient::new(&bare_url, config).unwrap();
    assert_eq!(bare.endpoint().as_str(), "http://127.0.0.1:7051/v1/proposals");
    let prefixed_url = Url::parse("http://127.0.0.1:7051/gateway").unwrap();
    let prefixed = HttpEndorserClient::new(&prefixed_url, config).unwrap();
    assert_eq!(prefixed.endpoint().as_str(), "http://127.0.0.1:7051/gateway/v1/proposals");
}

#[test]
fn default_log_filter_builds() {
    assert!(!log_filter().to_string().is_empty());
}
