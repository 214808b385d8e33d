// crates/peer-acl/src/resources.rs
// ============================================================================
// Module: Protected Resources
// Description: Process-wide resource identifiers and their default bindings.
// Purpose: Name protected peer operations and the policy each maps to.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Resources are opaque strings compared by exact match. Each built-in
//! resource is bound to a channel policy reference and to the identity shape
//! callers must present for it. Anything not listed in [`CATALOG`] is an
//! unknown resource.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::provider::IdentityShape;

// ============================================================================
// SECTION: Resource Identifiers
// ============================================================================

/// Submitting a proposal for endorsement.
pub const PROPOSE: &str = "PROPOSE";
/// Chaincode-to-chaincode invocation.
pub const CC2CC: &str = "CC2CC";
/// Block event subscription.
pub const BLOCKEVENT: &str = "BLOCKEVENT";
/// Lifecycle: install a chaincode package.
pub const LSCC_INSTALL: &str = "lscc/Install";
/// Lifecycle: instantiate a chaincode.
pub const LSCC_DEPLOY: &str = "lscc/Deploy";
/// Lifecycle: upgrade a chaincode.
pub const LSCC_UPGRADE: &str = "lscc/Upgrade";
/// Lifecycle: read chaincode data.
pub const LSCC_GETCCDATA: &str = "lscc/GetChaincodeData";
/// Lifecycle: list instantiated chaincodes.
pub const LSCC_GETCHAINCODES: &str = "lscc/GetInstantiatedChaincodes";
/// Query: chain info.
pub const QSCC_GETCHAININFO: &str = "qscc/GetChainInfo";
/// Query: block by number.
pub const QSCC_GETBLOCKBYNUMBER: &str = "qscc/GetBlockByNumber";
/// Configuration: read the config block.
pub const CSCC_GETCONFIGBLOCK: &str = "cscc/GetConfigBlock";
/// Configuration: list joined channels.
pub const CSCC_GETCHANNELS: &str = "cscc/GetChannels";

// ============================================================================
// SECTION: Policy References
// ============================================================================

/// Channel policy a resource is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyRef {
    /// Channel readers.
    Readers,
    /// Channel writers.
    Writers,
    /// Channel administrators.
    Admins,
    /// Members of the local organization.
    Members,
}

impl PolicyRef {
    /// Returns the policy path used in diagnostics.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Readers => "/Channel/Application/Readers",
            Self::Writers => "/Channel/Application/Writers",
            Self::Admins => "/Channel/Application/Admins",
            Self::Members => "/Local/Members",
        }
    }
}

impl fmt::Display for PolicyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Built-in binding of a resource to its policy and accepted identity shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Resource identifier.
    pub name: &'static str,
    /// Policy evaluated for the resource.
    pub policy: PolicyRef,
    /// Identity shape callers must present.
    pub accepts: IdentityShape,
}

/// Built-in resource catalog.
pub const CATALOG: &[ResourceSpec] = &[
    ResourceSpec {
        name: PROPOSE,
        policy: PolicyRef::Writers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: CC2CC,
        policy: PolicyRef::Writers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: BLOCKEVENT,
        policy: PolicyRef::Readers,
        accepts: IdentityShape::SignedData,
    },
    ResourceSpec {
        name: LSCC_INSTALL,
        policy: PolicyRef::Admins,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: LSCC_DEPLOY,
        policy: PolicyRef::Writers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: LSCC_UPGRADE,
        policy: PolicyRef::Writers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: LSCC_GETCCDATA,
        policy: PolicyRef::Readers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: LSCC_GETCHAINCODES,
        policy: PolicyRef::Readers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: QSCC_GETCHAININFO,
        policy: PolicyRef::Readers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: QSCC_GETBLOCKBYNUMBER,
        policy: PolicyRef::Readers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: CSCC_GETCONFIGBLOCK,
        policy: PolicyRef::Readers,
        accepts: IdentityShape::SignedProposal,
    },
    ResourceSpec {
        name: CSCC_GETCHANNELS,
        policy: PolicyRef::Members,
        accepts: IdentityShape::SignedProposal,
    },
];

/// Looks up a built-in resource by exact name.
#[must_use]
pub fn lookup(resource: &str) -> Option<&'static ResourceSpec> {
    CATALOG.iter().find(|spec| spec.name == resource)
}
