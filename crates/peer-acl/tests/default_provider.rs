// crates/peer-acl/tests/default_provider.rs
// ============================================================================
// Module: Default ACL Provider Tests
// Description: Verification and baseline decisions of the fallback provider.
// ============================================================================
//! ## Overview
//! Builds real signed proposals and signed data, then tampers with one field
//! at a time to confirm each verification step fails closed.

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

mod common;

use std::collections::BTreeMap;

use peer_acl::AclConfig;
use peer_acl::AclError;
use peer_acl::BaselineDecision;
use peer_acl::DefaultAclProvider;
use peer_acl::IdentityInfo;
use peer_acl::IdentityShape;
use peer_acl::PROPOSE;
use peer_acl::PolicyProvider;
use peer_acl::PolicyRef;
use peer_acl::resources::BLOCKEVENT;
use peer_acl::resources::CSCC_GETCHANNELS;
use peer_acl::resources::LSCC_DEPLOY;
use peer_acl::resources::LSCC_INSTALL;
use peer_core::ChannelId;
use peer_core::HeaderType;
use peer_core::MspId;
use peer_core::SignedData;
use peer_core::SignedProposal;
use peer_core::TxId;

fn allow_verified() -> DefaultAclProvider {
    DefaultAclProvider::new(BaselineDecision::AllowVerified)
}

fn mychannel() -> ChannelId {
    ChannelId::new("mychannel")
}

// ============================================================================
// SECTION: Baseline
// ============================================================================

#[test]
fn verified_proposal_is_denied_by_default_baseline() {
    let signed = common::signed_proposal(1, "mychannel");
    let result = DefaultAclProvider::default().check_acl(
        PROPOSE,
        &mychannel(),
        &IdentityInfo::SignedProposal(&signed),
    );
    match result {
        Err(AclError::Denied {
            resource,
            channel,
            reason,
        }) => {
            assert_eq!(resource, PROPOSE);
            assert_eq!(channel, mychannel());
            assert!(reason.contains("no policy provider configured"));
        }
        other => panic!("expected denial, got {other:?}"),
    }
}

#[test]
fn verified_proposal_is_allowed_by_allow_verified_baseline() {
    let signed = common::signed_proposal(1, "mychannel");
    let identity = IdentityInfo::SignedProposal(&signed);
    assert_eq!(allow_verified().check_acl(PROPOSE, &mychannel(), &identity), Ok(()));
    assert_eq!(allow_verified().check_acl(LSCC_DEPLOY, &mychannel(), &identity), Ok(()));
}

#[test]
fn denial_names_rebound_policy() {
    let provider = DefaultAclProvider::new(BaselineDecision::Deny)
        .with_policy_overrides(BTreeMap::from([(PROPOSE.to_string(), PolicyRef::Admins)]));
    let signed = common::signed_proposal(1, "mychannel");
    let err = provider
        .check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed))
        .unwrap_err();
    assert!(err.to_string().contains(&PolicyRef::Admins.to_string()));
}

// ============================================================================
// SECTION: Policy Bindings
// ============================================================================

#[test]
fn admin_resource_requires_admin_msp() {
    let signed = common::signed_proposal(1, "mychannel");
    let identity = IdentityInfo::SignedProposal(&signed);
    let err = allow_verified().check_acl(LSCC_INSTALL, &mychannel(), &identity).unwrap_err();
    assert!(matches!(err, AclError::Denied { ref reason, .. } if reason.contains("Admins")));

    let admins = allow_verified().with_admin_msps([MspId::new("Org1MSP")]);
    assert_eq!(admins.check_acl(LSCC_INSTALL, &mychannel(), &identity), Ok(()));
    let other_admins = allow_verified().with_admin_msps([MspId::new("Org2MSP")]);
    assert!(other_admins.check_acl(LSCC_INSTALL, &mychannel(), &identity).is_err());
}

#[test]
fn member_resource_requires_member_msp() {
    let signed = common::signed_proposal(1, "mychannel");
    let identity = IdentityInfo::SignedProposal(&signed);
    assert!(allow_verified().check_acl(CSCC_GETCHANNELS, &mychannel(), &identity).is_err());
    let members = allow_verified().with_member_msps([MspId::new("Org1MSP")]);
    assert_eq!(members.check_acl(CSCC_GETCHANNELS, &mychannel(), &identity), Ok(()));
}

#[test]
fn rebinding_to_admins_changes_the_decision() {
    let signed = common::signed_proposal(1, "mychannel");
    let identity = IdentityInfo::SignedProposal(&signed);
    assert_eq!(allow_verified().check_acl(PROPOSE, &mychannel(), &identity), Ok(()));

    let rebound = allow_verified()
        .with_policy_overrides(BTreeMap::from([(PROPOSE.to_string(), PolicyRef::Admins)]));
    assert!(matches!(
        rebound.check_acl(PROPOSE, &mychannel(), &identity),
        Err(AclError::Denied { .. })
    ));
    let rebound = rebound.with_admin_msps([MspId::new("Org1MSP")]);
    assert_eq!(rebound.check_acl(PROPOSE, &mychannel(), &identity), Ok(()));
}

#[test]
fn rebinding_admin_resource_to_readers_opens_it() {
    let signed = common::signed_proposal(1, "mychannel");
    let provider = allow_verified()
        .with_policy_overrides(BTreeMap::from([(LSCC_INSTALL.to_string(), PolicyRef::Readers)]));
    let result =
        provider.check_acl(LSCC_INSTALL, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert_eq!(result, Ok(()));
}

#[test]
fn signed_data_satisfies_member_policy_through_any_signer() {
    let items = [common::signed_data(1, b"deliver"), common::signed_data(2, b"deliver")];
    let provider = allow_verified()
        .with_policy_overrides(BTreeMap::from([(BLOCKEVENT.to_string(), PolicyRef::Members)]));
    let identity = IdentityInfo::SignedData(&items);
    assert!(provider.check_acl(BLOCKEVENT, &mychannel(), &identity).is_err());
    let provider = provider.with_member_msps([MspId::new("Org1MSP")]);
    assert_eq!(provider.check_acl(BLOCKEVENT, &mychannel(), &identity), Ok(()));
}

#[test]
fn configured_admin_msps_gate_rebound_resource() {
    let config: AclConfig = toml::from_str(
        r#"
        baseline = "allow_verified"
        admin_msp_ids = ["Org1MSP"]
        [resource_policies]
        "lscc/GetInstantiatedChaincodes" = "admins"
        "qscc/GetChainInfo" = "members"
        "#,
    )
    .unwrap();
    let provider = config.build_provider().unwrap();
    let signed = common::signed_proposal(1, "mychannel");
    let identity = IdentityInfo::SignedProposal(&signed);
    let allowed = provider.check_acl("lscc/GetInstantiatedChaincodes", &mychannel(), &identity);
    assert_eq!(allowed, Ok(()));
    assert!(provider.check_acl("qscc/GetChainInfo", &mychannel(), &identity).is_err());
}

// ============================================================================
// SECTION: Input Validation
// ============================================================================

#[test]
fn text_identity_is_unsupported() {
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::Text("badidtype"));
    assert_eq!(
        result,
        Err(AclError::UnsupportedIdentity {
            resource: PROPOSE.to_string(),
            shape: IdentityShape::Text,
        })
    );
}

#[test]
fn serialized_identity_is_unsupported() {
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::Serialized(b"blob"));
    assert!(matches!(result, Err(AclError::UnsupportedIdentity { .. })));
}

#[test]
fn signed_data_is_unsupported_for_proposal_resources() {
    let item = common::signed_data(1, b"hello");
    let items = [item];
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedData(&items));
    assert!(matches!(
        result,
        Err(AclError::UnsupportedIdentity {
            shape: IdentityShape::SignedData,
            ..
        })
    ));
}

#[test]
fn unknown_resource_is_rejected_before_identity() {
    let result =
        allow_verified().check_acl("unknownresource", &mychannel(), &IdentityInfo::Text("x"));
    assert!(matches!(result, Err(AclError::UnknownResource { .. })));
}

// ============================================================================
// SECTION: Proposal Verification
// ============================================================================

#[test]
fn channel_mismatch_is_rejected() {
    let signed = common::signed_proposal(1, "otherchannel");
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert_eq!(
        result,
        Err(AclError::ChannelMismatch {
            expected: mychannel(),
            actual: ChannelId::new("otherchannel"),
        })
    );
}

#[test]
fn tampered_signature_is_rejected() {
    let mut signed = common::signed_proposal(1, "mychannel");
    signed.signature[0] ^= 0xFF;
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })));
}

#[test]
fn signature_from_other_key_is_rejected() {
    let creator = common::identity(1);
    let impostor = common::identity(2);
    let signed = common::sign(&impostor, &common::proposal(&creator, "mychannel"));
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })));
}

#[test]
fn tx_id_not_bound_to_nonce_is_rejected() {
    let signer = common::identity(1);
    let mut proposal = common::proposal(&signer, "mychannel");
    proposal.header.channel_header.tx_id = TxId::new("forged");
    let signed = common::sign(&signer, &proposal);
    let err = allow_verified()
        .check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed))
        .unwrap_err();
    assert!(err.to_string().contains("transaction id"));
}

#[test]
fn config_update_header_is_rejected() {
    let signer = common::identity(1);
    let mut proposal = common::proposal(&signer, "mychannel");
    proposal.header.channel_header.header_type = HeaderType::ConfigUpdate;
    let signed = common::sign(&signer, &proposal);
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })));
}

#[test]
fn undecodable_proposal_is_rejected() {
    let signed = peer_core::SignedProposal {
        proposal_bytes: b"not json".to_vec(),
        signature: vec![0; 64],
    };
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })));
}

#[test]
fn small_order_creator_with_zero_signature_is_rejected() {
    let mut proposal = common::proposal(&common::identity(1), "mychannel");
    let creator = common::small_order_creator();
    proposal.header.channel_header.tx_id =
        TxId::compute(&proposal.header.signature_header.nonce, &creator);
    proposal.header.signature_header.creator = creator;
    let signed = SignedProposal {
        proposal_bytes: proposal.to_bytes().unwrap(),
        signature: common::small_order_signature(),
    };
    let result =
        allow_verified().check_acl(PROPOSE, &mychannel(), &IdentityInfo::SignedProposal(&signed));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })), "got {result:?}");
}

// ============================================================================
// SECTION: Signed Data Verification
// ============================================================================

#[test]
fn block_event_accepts_verified_signed_data() {
    let items = [common::signed_data(1, b"deliver"), common::signed_data(2, b"deliver")];
    let result =
        allow_verified().check_acl(BLOCKEVENT, &mychannel(), &IdentityInfo::SignedData(&items));
    assert_eq!(result, Ok(()));
}

#[test]
fn block_event_rejects_empty_signed_data() {
    let result =
        allow_verified().check_acl(BLOCKEVENT, &mychannel(), &IdentityInfo::SignedData(&[]));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })));
}

#[test]
fn block_event_rejects_any_bad_item() {
    let mut bad = common::signed_data(2, b"deliver");
    bad.data = b"tampered".to_vec();
    let items = [common::signed_data(1, b"deliver"), bad];
    let result =
        allow_verified().check_acl(BLOCKEVENT, &mychannel(), &IdentityInfo::SignedData(&items));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })));
}

#[test]
fn block_event_rejects_small_order_signer() {
    let forged = SignedData {
        data: b"deliver".to_vec(),
        identity: common::small_order_creator(),
        signature: common::small_order_signature(),
    };
    let items = [forged];
    let result =
        allow_verified().check_acl(BLOCKEVENT, &mychannel(), &IdentityInfo::SignedData(&items));
    assert!(matches!(result, Err(AclError::MalformedIdentity { .. })), "got {result:?}");
}

#[test]
fn block_event_rejects_signed_proposal() {
    let signed = common::signed_proposal(1, "mychannel");
    let result = allow_verified().check_acl(
        BLOCKEVENT,
        &mychannel(),
        &IdentityInfo::SignedProposal(&signed),
    );
    assert!(matches!(result, Err(AclError::UnsupportedIdentity { .. })));
}
