// crates/peer-acl/src/config.rs
// ============================================================================
// Module: ACL Configuration
// Description: Configuration for the fallback ACL provider.
// Purpose: Build the default provider from validated settings.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! `[acl]` settings choose the baseline decision for verified callers,
//! optionally rebind catalog resources to different policy references, and
//! name the MSPs that satisfy the admin and member policies.
//! Validation fails closed: unknown resource names are rejected instead of
//! being silently ignored.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use peer_core::MspId;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::default_provider::BaselineDecision;
use crate::default_provider::DefaultAclProvider;
use crate::resources::PolicyRef;
use crate::resources::lookup;

// ============================================================================
// SECTION: Config
// ============================================================================

/// ACL configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AclConfig {
    /// Decision for verified callers when no policy engine is configured.
    #[serde(default)]
    pub baseline: BaselineDecision,
    /// Policy reference overrides keyed by resource identifier.
    #[serde(default)]
    pub resource_policies: BTreeMap<String, PolicyRef>,
    /// MSP identifiers whose verified identities satisfy the admins policy.
    #[serde(default)]
    pub admin_msp_ids: Vec<String>,
    /// MSP identifiers whose verified identities satisfy the members policy.
    #[serde(default)]
    pub member_msp_ids: Vec<String>,
}

/// ACL configuration errors.
#[derive(Debug, Error)]
pub enum AclConfigError {
    /// A policy override names a resource outside the catalog.
    #[error("acl.resource_policies names unknown resource: {0}")]
    UnknownResource(String),
    /// An MSP list contains an empty identifier.
    #[error("acl.{0} contains an empty msp id")]
    EmptyMspId(&'static str),
}

impl AclConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AclConfigError`] when a resource override is unknown or an
    /// MSP list holds an empty identifier.
    pub fn validate(&self) -> Result<(), AclConfigError> {
        for resource in self.resource_policies.keys() {
            if lookup(resource).is_none() {
                return Err(AclConfigError::UnknownResource(resource.clone()));
            }
        }
        if self.admin_msp_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(AclConfigError::EmptyMspId("admin_msp_ids"));
        }
        if self.member_msp_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(AclConfigError::EmptyMspId("member_msp_ids"));
        }
        Ok(())
    }

    /// Builds the default provider described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AclConfigError`] when the configuration is invalid.
    pub fn build_provider(&self) -> Result<DefaultAclProvider, AclConfigError> {
        self.validate()?;
        Ok(DefaultAclProvider::new(self.baseline)
            .with_policy_overrides(self.resource_policies.clone())
            .with_admin_msps(msp_set(&self.admin_msp_ids))
            .with_member_msps(msp_set(&self.member_msp_ids)))
    }
}

/// Converts configured MSP identifiers into typed identifiers.
fn msp_set(ids: &[String]) -> impl Iterator<Item = MspId> + '_ {
    ids.iter().map(|id| MspId::new(id.trim()))
}
