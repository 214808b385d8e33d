// crates/peer-acl/src/default_provider.rs
// ============================================================================
// Module: Default ACL Provider
// Description: Fallback provider installed when no policy backend is registered.
// Purpose: Keep enforcement present and fail closed without a policy engine.
// Dependencies: peer-core, tracing
// ============================================================================

//! ## Overview
//! [`DefaultAclProvider`] is what the registry installs when `None` is
//! registered. It validates everything it can without a policy engine:
//! the resource must be in the built-in catalog, the identity shape must be
//! the one the resource accepts, and the identity must verify (signature,
//! transaction id binding, and channel binding). Whatever survives those
//! checks gets the [`BaselineDecision`], which denies unless a test setup
//! explicitly opts into [`BaselineDecision::AllowVerified`].
//!
//! Under `AllowVerified` the policy bound to the resource still matters:
//! reader and writer policies accept any verified caller, while admin and
//! member policies require the verified creator's MSP to be listed in the
//! corresponding MSP set. Rebinding a resource to a different policy therefore
//! changes who gets through.
//!
//! Security posture: this provider is the floor of enforcement; it must never
//! allow unverified or malformed input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use peer_core::ChannelId;
use peer_core::HeaderType;
use peer_core::MspId;
use peer_core::SerializedIdentity;
use peer_core::SignedData;
use peer_core::SignedProposal;
use peer_core::TxId;
use peer_core::verify_signature;
use serde::Deserialize;
use serde::Serialize;

use crate::provider::AclError;
use crate::provider::IdentityInfo;
use crate::provider::PolicyProvider;
use crate::resources::PolicyRef;
use crate::resources::lookup;

// ============================================================================
// SECTION: Baseline Decision
// ============================================================================

/// Decision applied to verified requests when no policy engine is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineDecision {
    /// Deny every request that reaches the baseline.
    #[default]
    Deny,
    /// Allow verified callers that satisfy the resource's policy binding.
    /// Testing only.
    AllowVerified,
}

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Fallback provider used when no policy backend is registered.
///
/// # Invariants
/// - Unknown resources, unsupported shapes, and unverifiable identities are
///   always rejected regardless of the baseline.
#[derive(Debug, Clone, Default)]
pub struct DefaultAclProvider {
    /// Decision for verified requests.
    baseline: BaselineDecision,
    /// Policy reference overrides for catalog resources.
    policy_overrides: BTreeMap<String, PolicyRef>,
    /// MSPs whose verified identities satisfy [`PolicyRef::Admins`].
    admin_msps: BTreeSet<MspId>,
    /// MSPs whose verified identities satisfy [`PolicyRef::Members`].
    member_msps: BTreeSet<MspId>,
}

impl DefaultAclProvider {
    /// Creates a provider with the given baseline.
    #[must_use]
    pub const fn new(baseline: BaselineDecision) -> Self {
        Self {
            baseline,
            policy_overrides: BTreeMap::new(),
            admin_msps: BTreeSet::new(),
            member_msps: BTreeSet::new(),
        }
    }

    /// Replaces the policy reference recorded for catalog resources.
    ///
    /// Entries for resources outside the catalog are ignored by checks; config
    /// validation rejects them before they get here.
    #[must_use]
    pub fn with_policy_overrides(mut self, overrides: BTreeMap<String, PolicyRef>) -> Self {
        self.policy_overrides = overrides;
        self
    }

    /// Sets the MSPs whose members count as administrators.
    #[must_use]
    pub fn with_admin_msps(mut self, msps: impl IntoIterator<Item = MspId>) -> Self {
        self.admin_msps = msps.into_iter().collect();
        self
    }

    /// Sets the MSPs whose members count as local organization members.
    #[must_use]
    pub fn with_member_msps(mut self, msps: impl IntoIterator<Item = MspId>) -> Self {
        self.member_msps = msps.into_iter().collect();
        self
    }

    /// Returns the configured baseline.
    #[must_use]
    pub const fn baseline(&self) -> BaselineDecision {
        self.baseline
    }

    /// Returns the policy reference applied to `resource`, if it is known.
    #[must_use]
    pub fn policy_for(&self, resource: &str) -> Option<PolicyRef> {
        let spec = lookup(resource)?;
        Some(self.policy_overrides.get(resource).copied().unwrap_or(spec.policy))
    }
}

impl DefaultAclProvider {
    /// Returns true when any verified identity satisfies `policy`.
    fn satisfies(&self, policy: PolicyRef, verified: &[SerializedIdentity]) -> bool {
        let allowed = match policy {
            PolicyRef::Readers | PolicyRef::Writers => return !verified.is_empty(),
            PolicyRef::Admins => &self.admin_msps,
            PolicyRef::Members => &self.member_msps,
        };
        verified.iter().any(|identity| allowed.contains(&identity.msp_id))
    }
}

impl PolicyProvider for DefaultAclProvider {
    fn check_acl(
        &self,
        resource: &str,
        channel: &ChannelId,
        identity: &IdentityInfo<'_>,
    ) -> Result<(), AclError> {
        let Some(spec) = lookup(resource) else {
            return Err(AclError::UnknownResource {
                resource: resource.to_string(),
            });
        };
        if identity.shape() != spec.accepts {
            return Err(AclError::UnsupportedIdentity {
                resource: resource.to_string(),
                shape: identity.shape(),
            });
        }
        let verified = match identity {
            IdentityInfo::SignedProposal(proposal) => {
                vec![verify_signed_proposal(resource, channel, proposal)?]
            }
            IdentityInfo::SignedData(items) => verify_signed_data(resource, items)?,
            IdentityInfo::Serialized(_) | IdentityInfo::Text(_) => {
                return Err(AclError::UnsupportedIdentity {
                    resource: resource.to_string(),
                    shape: identity.shape(),
                });
            }
        };
        let policy = self.policy_for(resource).unwrap_or(spec.policy);
        let denied = |reason: String| AclError::Denied {
            resource: resource.to_string(),
            channel: channel.clone(),
            reason,
        };
        match self.baseline {
            BaselineDecision::Deny => {
                Err(denied(format!("no policy provider configured to evaluate {policy}")))
            }
            BaselineDecision::AllowVerified => {
                if !self.satisfies(policy, &verified) {
                    return Err(denied(format!("verified identity does not satisfy {policy}")));
                }
                tracing::debug!(resource, %channel, %policy, "baseline allows verified identity");
                Ok(())
            }
        }
    }
}

// ============================================================================
// SECTION: Verification
// ============================================================================

/// Verifies a signed proposal and its binding to `channel`, returning the creator.
fn verify_signed_proposal(
    resource: &str,
    channel: &ChannelId,
    signed: &SignedProposal,
) -> Result<SerializedIdentity, AclError> {
    let malformed = |reason: String| AclError::MalformedIdentity {
        resource: resource.to_string(),
        reason,
    };
    let proposal = signed.proposal().map_err(|err| malformed(err.to_string()))?;
    let channel_header = &proposal.header.channel_header;
    if channel_header.header_type != HeaderType::EndorserTransaction {
        return Err(malformed("proposal header is not an endorser transaction".to_string()));
    }
    if &channel_header.channel_id != channel {
        return Err(AclError::ChannelMismatch {
            expected: channel.clone(),
            actual: channel_header.channel_id.clone(),
        });
    }
    let signature_header = &proposal.header.signature_header;
    let expected_tx_id = TxId::compute(&signature_header.nonce, &signature_header.creator);
    if channel_header.tx_id != expected_tx_id {
        return Err(malformed("transaction id does not match nonce and creator".to_string()));
    }
    verify_signature(&signature_header.creator, &signed.proposal_bytes, &signed.signature)
        .map_err(|err| malformed(err.to_string()))
}

/// Verifies every signed data item, returning the signers.
fn verify_signed_data(
    resource: &str,
    items: &[SignedData],
) -> Result<Vec<SerializedIdentity>, AclError> {
    if items.is_empty() {
        return Err(AclError::MalformedIdentity {
            resource: resource.to_string(),
            reason: "no signed data presented".to_string(),
        });
    }
    items
        .iter()
        .map(|item| {
            verify_signature(&item.identity, &item.data, &item.signature).map_err(|err| {
                AclError::MalformedIdentity {
                    resource: resource.to_string(),
                    reason: err.to_string(),
                }
            })
        })
        .collect()
}
