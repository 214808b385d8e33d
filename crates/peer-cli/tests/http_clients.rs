// crates/peer-cli/tests/http_clients.rs
// ============================================================================
// Module: HTTP Client Tests
// Description: Endorser and broadcast clients against a local HTTP server.
// Purpose: Validate wire format, status mapping, size limits, and close handling.
// Dependencies: peer-cli, peer-core, tiny_http
// ============================================================================

//! ## Overview
//! Each test starts a one-shot `tiny_http` server on a loopback port,
//! captures the request it receives, and answers with a canned response.

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

use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use peer_cli::transport::HttpBroadcastClient;
use peer_cli::transport::HttpEndorserClient;
use peer_cli::transport::HttpTransportConfig;
use peer_core::BroadcastClient;
use peer_core::ClientError;
use peer_core::EndorserClient;
use peer_core::Endorsement;
use peer_core::Envelope;
use peer_core::ProposalResponse;
use peer_core::RequestContext;
use peer_core::ResponseStatus;
use peer_core::SignedProposal;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Request observed by the test server.
#[derive(Debug)]
struct Captured {
    /// HTTP method.
    method: String,
    /// Request path.
    url: String,
    /// Request body.
    body: String,
}

/// Starts a server answering one request with `status` and `body`.
fn serve_once(status: u16, body: impl Into<String>) -> (Url, JoinHandle<Captured>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let url = Url::parse(&format!("http://{addr}")).unwrap();
    let body = body.into();
    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut body_in = String::new();
        request.as_reader().read_to_string(&mut body_in).unwrap();
        let captured = Captured {
            method: request.method().to_string(),
            url: request.url().to_string(),
            body: body_in,
        };
        let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let response = Response::from_string(body).with_status_code(status).with_header(header);
        let _ = request.respond(response);
        captured
    });
    (url, handle)
}

/// Signed proposal sent by the endorser tests.
fn proposal() -> SignedProposal {
    SignedProposal {
        proposal_bytes: br#"{"header":{}}"#.to_vec(),
        signature: vec![5; 64],
    }
}

/// Envelope sent by the broadcast tests.
fn envelope() -> Envelope {
    Envelope {
        payload: b"payload".to_vec(),
        signature: vec![6; 64],
    }
}

/// Endorser client with default limits.
fn endorser(url: &Url) -> HttpEndorserClient {
    HttpEndorserClient::new(url, HttpTransportConfig::default()).unwrap()
}

// ============================================================================
// SECTION: Endorser
// ============================================================================

#[test]
fn endorser_posts_json_and_decodes_response() {
    let answer = ProposalResponse {
        status: ResponseStatus::SUCCESS,
        message: "ok".to_string(),
        payload: b"result".to_vec(),
        endorsement: Some(Endorsement {
            endorser: b"peer0".to_vec(),
            signature: vec![1; 64],
        }),
    };
    let (url, server) = serve_once(200, serde_json::to_string(&answer).unwrap());

    let response =
        endorser(&url).process_proposal(&RequestContext::background(), &proposal()).unwrap();
    let captured = server.join().unwrap();

    assert_eq!(response, Some(answer));
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.url, "/v1/proposals");
    let sent: SignedProposal = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, proposal());
}

#[test]
fn no_content_means_no_response() {
    let (url, server) = serve_once(204, "");
    let response =
        endorser(&url).process_proposal(&RequestContext::background(), &proposal()).unwrap();
    server.join().unwrap();
    assert!(response.is_none());
}

#[test]
fn error_status_is_rejected_with_body() {
    let (url, server) = serve_once(403, "creator not authorized");
    let err =
        endorser(&url).process_proposal(&RequestContext::background(), &proposal()).unwrap_err();
    server.join().unwrap();
    match err {
        ClientError::Rejected {
            status,
            message,
        } => {
            assert_eq!(status, 403);
            assert_eq!(message, "creator not authorized");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn undecodable_response_is_invalid() {
    let (url, server) = serve_once(200, r#"{"status":"nope"}"#);
    let err =
        endorser(&url).process_proposal(&RequestContext::background(), &proposal()).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[test]
fn oversized_response_is_refused() {
    let (url, server) = serve_once(200, r#"{"status":200,"message":"this body is far too long"}"#);
    let config = HttpTransportConfig {
        max_response_bytes: 16,
        ..HttpTransportConfig::default()
    };
    let client = HttpEndorserClient::new(&url, config).unwrap();
    let err = client.process_proposal(&RequestContext::background(), &proposal()).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ClientError::InvalidResponse(message) if message.contains("size limit")));
}

#[test]
fn redirects_are_not_followed() {
    let (url, server) = serve_once(307, "");
    let err =
        endorser(&url).process_proposal(&RequestContext::background(), &proposal()).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ClientError::Rejected { status: 307, .. }));
}

#[test]
fn cancelled_context_never_sends() {
    let ctx = RequestContext::background();
    ctx.cancel();
    let client = endorser(&Url::parse("http://127.0.0.1:9").unwrap());
    assert!(matches!(client.process_proposal(&ctx, &proposal()), Err(ClientError::Cancelled)));
    let expired = RequestContext::background().with_timeout(Duration::ZERO);
    assert!(matches!(client.process_proposal(&expired, &proposal()), Err(ClientError::Cancelled)));
}

#[test]
fn unreachable_endorser_is_transport_error() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    drop(server);
    let config = HttpTransportConfig {
        connect_timeout: Duration::from_millis(500),
        request_timeout: Duration::from_secs(2),
        ..HttpTransportConfig::default()
    };
    let url = Url::parse(&format!("http://{addr}")).unwrap();
    let client = HttpEndorserClient::new(&url, config).unwrap();
    let err = client.process_proposal(&RequestContext::background(), &proposal()).unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

// ============================================================================
// SECTION: Broadcast
// ============================================================================

#[test]
fn broadcast_posts_envelope() {
    let (url, server) = serve_once(202, "");
    let client = HttpBroadcastClient::new(&url, HttpTransportConfig::default()).unwrap();
    client.send(&envelope()).unwrap();
    let captured = server.join().unwrap();
    assert_eq!(captured.url, "/v1/broadcast");
    let sent: Envelope = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, envelope());
}

#[test]
fn broadcast_rejection_carries_status() {
    let (url, server) = serve_once(503, "ordering service unavailable");
    let client = HttpBroadcastClient::new(&url, HttpTransportConfig::default()).unwrap();
    let err = client.send(&envelope()).unwrap_err();
    server.join().unwrap();
    assert!(matches!(
        err,
        ClientError::Rejected { status: 503, message } if message.contains("unavailable")
    ));
}

#[test]
fn send_after_close_fails_and_close_is_idempotent() {
    let url = Url::parse("http://127.0.0.1:9").unwrap();
    let client = HttpBroadcastClient::new(&url, HttpTransportConfig::default()).unwrap();
    assert!(!client.is_closed());
    client.close().unwrap();
    client.close().unwrap();
    assert!(client.is_closed());
    assert!(matches!(client.send(&envelope()), Err(ClientError::Closed)));
}
