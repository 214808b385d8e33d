// crates/peer-acl/src/provider.rs
// ============================================================================
// Module: Policy Provider Contract
// Description: Caller identity shapes, ACL errors, and the provider trait.
// Purpose: Define the single capability every ACL backend implements.
// Dependencies: peer-core, thiserror
// ============================================================================

//! ## Overview
//! A [`PolicyProvider`] answers one question through
//! [`PolicyProvider::check_acl`]: `Ok(())` allows, any [`AclError`] denies.
//! Callers present their identity as an [`IdentityInfo`]; providers inspect
//! the concrete shape and must reject shapes a resource does not accept with
//! [`AclError::UnsupportedIdentity`] instead of deciding on them.
//!
//! ## Invariants
//! - Results are binary from the caller's perspective.
//! - Unknown resources and unsupported identity shapes are errors.
//! - Providers never panic on caller input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use peer_core::ChannelId;
use peer_core::SignedData;
use peer_core::SignedProposal;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Identity Info
// ============================================================================

/// Identity material presented by a caller.
#[derive(Debug, Clone, Copy)]
pub enum IdentityInfo<'a> {
    /// Signed proposal carrying creator and signature.
    SignedProposal(&'a SignedProposal),
    /// Signed data items (event subscriptions and similar requests).
    SignedData(&'a [SignedData]),
    /// Raw serialized identity blob without a signature.
    Serialized(&'a [u8]),
    /// Bare string label.
    Text(&'a str),
}

impl IdentityInfo<'_> {
    /// Returns the shape of the identity material.
    #[must_use]
    pub const fn shape(&self) -> IdentityShape {
        match self {
            Self::SignedProposal(_) => IdentityShape::SignedProposal,
            Self::SignedData(_) => IdentityShape::SignedData,
            Self::Serialized(_) => IdentityShape::Serialized,
            Self::Text(_) => IdentityShape::Text,
        }
    }
}

impl<'a> From<&'a SignedProposal> for IdentityInfo<'a> {
    fn from(value: &'a SignedProposal) -> Self {
        Self::SignedProposal(value)
    }
}

impl<'a> From<&'a [SignedData]> for IdentityInfo<'a> {
    fn from(value: &'a [SignedData]) -> Self {
        Self::SignedData(value)
    }
}

impl<'a> From<&'a str> for IdentityInfo<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// Shape of caller identity material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityShape {
    /// [`IdentityInfo::SignedProposal`].
    SignedProposal,
    /// [`IdentityInfo::SignedData`].
    SignedData,
    /// [`IdentityInfo::Serialized`].
    Serialized,
    /// [`IdentityInfo::Text`].
    Text,
}

impl IdentityShape {
    /// Returns a stable label for logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignedProposal => "signed_proposal",
            Self::SignedData => "signed_data",
            Self::Serialized => "serialized_identity",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for IdentityShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Access-control errors. Any variant means the call is not allowed.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AclError {
    /// Resource is not known to the provider.
    #[error("unknown resource: {resource}")]
    UnknownResource {
        /// Requested resource.
        resource: String,
    },
    /// Identity shape is not accepted for the resource.
    #[error("unsupported identity type {shape} for resource {resource}")]
    UnsupportedIdentity {
        /// Requested resource.
        resource: String,
        /// Shape that was presented.
        shape: IdentityShape,
    },
    /// Identity material is malformed or fails verification.
    #[error("malformed identity for resource {resource}: {reason}")]
    MalformedIdentity {
        /// Requested resource.
        resource: String,
        /// Failure detail.
        reason: String,
    },
    /// Identity material is bound to a different channel.
    #[error("identity bound to channel {actual}, request targets {expected}")]
    ChannelMismatch {
        /// Channel the check was requested for.
        expected: ChannelId,
        /// Channel named by the identity material.
        actual: ChannelId,
    },
    /// Policy evaluation denied access.
    #[error("access denied for resource {resource} on channel {channel}: {reason}")]
    Denied {
        /// Requested resource.
        resource: String,
        /// Requested channel.
        channel: ChannelId,
        /// Denial reason.
        reason: String,
    },
    /// Provider failed to reach a decision.
    #[error("policy provider error: {0}")]
    Provider(String),
}

impl AclError {
    /// Returns true when the error reflects malformed input rather than policy.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::UnknownResource { .. }
                | Self::UnsupportedIdentity { .. }
                | Self::MalformedIdentity { .. }
                | Self::ChannelMismatch { .. }
        )
    }
}

// ============================================================================
// SECTION: Provider Contract
// ============================================================================

/// Access-control backend.
pub trait PolicyProvider: Send + Sync {
    /// Checks whether `identity` may invoke `resource` on `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`AclError`] when access is denied or the input is malformed.
    fn check_acl(
        &self,
        resource: &str,
        channel: &ChannelId,
        identity: &IdentityInfo<'_>,
    ) -> Result<(), AclError>;
}

/// Adapter turning a closure into a [`PolicyProvider`].
pub struct FnPolicy<F>(pub F);

impl<F> PolicyProvider for FnPolicy<F>
where
    F: Fn(&str, &ChannelId, &IdentityInfo<'_>) -> Result<(), AclError> + Send + Sync,
{
    fn check_acl(
        &self,
        resource: &str,
        channel: &ChannelId,
        identity: &IdentityInfo<'_>,
    ) -> Result<(), AclError> {
        (self.0)(resource, channel, identity)
    }
}

/// Wraps a closure as a shareable provider.
///
/// The `Fn` bound drives closure signature inference, so plain
/// `|resource, channel, identity| ...` closures work without annotations.
pub fn policy_fn<F>(check: F) -> Arc<dyn PolicyProvider>
where
    F: Fn(&str, &ChannelId, &IdentityInfo<'_>) -> Result<(), AclError> + Send + Sync + 'static,
{
    Arc::new(FnPolicy(check))
}
