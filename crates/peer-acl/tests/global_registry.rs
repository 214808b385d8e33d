// crates/peer-acl/tests/global_registry.rs
// ============================================================================
// Module: Process-Wide Registry Tests
// Description: Lifecycle of the process-wide ACL registry.
// ============================================================================
//! ## Overview
//! The process-wide registry can only be registered once per process, so this
//! binary holds a single test that walks the whole lifecycle in order.

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

use std::panic;

use peer_acl::AclError;
use peer_acl::ConfigTxError;
use peer_acl::IdentityInfo;
use peer_acl::PROPOSE;
use peer_acl::acl_provider;
use peer_acl::config_tx_processor;
use peer_acl::global_registry;
use peer_acl::policy_fn;
use peer_acl::register_acl_provider;
use peer_core::ChannelId;
use peer_core::SignedProposal;

#[test]
fn global_registry_lifecycle() {
    let channel = ChannelId::new("mychannel");

    let early = panic::catch_unwind(|| {
        let _ = acl_provider();
    });
    assert!(early.is_err(), "provider before registration must panic");
    assert!(!global_registry().is_registered());
    assert_eq!(
        config_tx_processor().generate_simulation_results(None),
        Err(ConfigTxError::NotRegistered)
    );

    assert!(register_acl_provider(None));
    assert_eq!(config_tx_processor().generate_simulation_results(None), Ok(None));
    assert!(!register_acl_provider(Some(policy_fn(|_, _, _| Ok(())))));

    let text = acl_provider().check_acl(PROPOSE, &channel, &IdentityInfo::Text("badidtype"));
    assert!(matches!(text, Err(AclError::UnsupportedIdentity { .. })));

    let proposal = SignedProposal::default();
    let identity = IdentityInfo::SignedProposal(&proposal);
    assert!(acl_provider().check_acl("unknownresource", &channel, &identity).is_err());

    global_registry().overrides().insert_fn("unknownresource", |_, _, _| Ok(()));
    assert_eq!(acl_provider().check_acl("unknownresource", &channel, &identity), Ok(()));
    global_registry().overrides().remove("unknownresource");
    assert!(acl_provider().check_acl("unknownresource", &channel, &identity).is_err());
}
