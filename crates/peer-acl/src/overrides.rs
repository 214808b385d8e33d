// crates/peer-acl/src/overrides.rs
// ============================================================================
// Module: ACL Override Table
// Description: Per-resource providers that short-circuit the registered one.
// Purpose: Let internal call sites and tests substitute one resource's check.
// Dependencies: peer-core
// ============================================================================

//! ## Overview
//! The override table maps a resource identifier to a provider that replaces
//! the registered provider for that resource only. Overrides are meant to be
//! installed during startup or test setup. The table is lock-guarded so later
//! mutation is memory-safe, and lookups clone the entry out before invoking
//! it so an override may itself touch the table.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use peer_core::ChannelId;

use crate::provider::AclError;
use crate::provider::FnPolicy;
use crate::provider::IdentityInfo;
use crate::provider::PolicyProvider;

// ============================================================================
// SECTION: Override Table
// ============================================================================

/// Resource-keyed override providers.
///
/// # Invariants
/// - At most one override per resource identifier.
#[derive(Default)]
pub struct OverrideTable {
    /// Override providers keyed by exact resource identifier.
    entries: RwLock<BTreeMap<String, Arc<dyn PolicyProvider>>>,
}

impl OverrideTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Installs `provider` for `resource`, returning the replaced override.
    pub fn insert(
        &self,
        resource: impl Into<String>,
        provider: Arc<dyn PolicyProvider>,
    ) -> Option<Arc<dyn PolicyProvider>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource.into(), provider)
    }

    /// Installs a closure override for `resource`.
    pub fn insert_fn<F>(
        &self,
        resource: impl Into<String>,
        check: F,
    ) -> Option<Arc<dyn PolicyProvider>>
    where
        F: Fn(&str, &ChannelId, &IdentityInfo<'_>) -> Result<(), AclError> + Send + Sync + 'static,
    {
        self.insert(resource, Arc::new(FnPolicy(check)))
    }

    /// Removes the override for `resource`. Returns true when one existed.
    pub fn remove(&self, resource: &str) -> bool {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).remove(resource).is_some()
    }

    /// Returns the override for `resource`, if any.
    #[must_use]
    pub fn get(&self, resource: &str) -> Option<Arc<dyn PolicyProvider>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(resource).cloned()
    }

    /// Returns true when `resource` has an override.
    #[must_use]
    pub fn contains(&self, resource: &str) -> bool {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).contains_key(resource)
    }

    /// Returns the overridden resource identifiers in order.
    #[must_use]
    pub fn resources(&self) -> Vec<String> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
    }

    /// Removes every override.
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl fmt::Debug for OverrideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideTable").field("resources", &self.resources()).finish()
    }
}
