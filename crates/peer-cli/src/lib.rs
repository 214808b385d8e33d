// crates/peer-cli/src/lib.rs
// ============================================================================
// Module: Peer CLI Library
// Description: Shared helpers for the peer command-line interface.
// Purpose: Provide transport, key loading, and logging for the binary and tests.
// Dependencies: peer-core, reqwest, tracing-subscriber
// ============================================================================

//! ## Overview
//! Helpers used by the `peer` binary: HTTP endorser and broadcast clients,
//! bounded file reads for keys and saved messages, and logging setup. The
//! binary entry point (`src/main.rs`) wires them into the commands.
//!
//! Security posture: CLI inputs are untrusted; files are read with size
//! limits and remote responses are bounded.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod files;
pub mod logging;
pub mod transport;

#[cfg(test)]
mod tests;
