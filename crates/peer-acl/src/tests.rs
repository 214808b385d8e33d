// crates/peer-acl/src/tests.rs
// ============================================================================
// Module: ACL Unit Tests
// Description: Registry lifecycle tests against private registry instances.
// Purpose: Cover reset and registration ordering without global state.
// Dependencies: peer-acl
// ============================================================================

//! ## Overview
//! Unit tests that need [`crate::AclRegistry::reset`], which only exists in
//! test builds.

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

use peer_core::ChannelId;

use crate::AclError;
use crate::AclRegistry;
use crate::IdentityInfo;
use crate::PROPOSE;
use crate::policy_fn;

#[test]
fn reset_allows_fresh_registration() {
    let mut registry = AclRegistry::new();
    assert!(registry.register(None));
    registry.overrides().insert_fn(PROPOSE, |_, _, _| Ok(()));
    registry.reset();
    assert!(!registry.is_registered());
    assert!(registry.overrides().resources().is_empty());

    assert!(registry.register(Some(policy_fn(|_, _, _| Ok(())))));
    let result =
        registry.provider().check_acl(PROPOSE, &ChannelId::new("c"), &IdentityInfo::Text("x"));
    assert_eq!(result, Ok(()));
}

#[test]
fn debug_output_reports_registration() {
    let registry = AclRegistry::new();
    assert!(format!("{registry:?}").contains("registered: false"));
    registry.register(None);
    assert!(format!("{registry:?}").contains("registered: true"));
}

#[test]
fn malformed_classification() {
    let unknown = AclError::UnknownResource {
        resource: "x".to_string(),
    };
    let denied = AclError::Denied {
        resource: PROPOSE.to_string(),
        channel: ChannelId::new("c"),
        reason: "no".to_string(),
    };
    assert!(unknown.is_malformed());
    assert!(!denied.is_malformed());
    assert!(!AclError::Provider("down".to_string()).is_malformed());
}
