// crates/peer-acl/src/registry.rs
// ============================================================================
// Module: ACL Registry
// Description: Set-once holder of the active policy provider plus overrides.
// Purpose: Give request paths one source of truth for access decisions.
// Dependencies: peer-core, tracing
// ============================================================================

//! ## Overview
//! [`AclRegistry`] holds exactly one [`PolicyProvider`] once registered. The
//! first call to [`AclRegistry::register`] wins; concurrent and later calls are
//! ignored. Registering `None` installs the registry's fallback
//! [`DefaultAclProvider`], built only at that moment.
//!
//! [`AclRegistry::provider`] hands out an [`AclProviderHandle`] that consults
//! the [`OverrideTable`] before the registered provider. Asking for the
//! provider before anything was registered is a startup-ordering bug and
//! aborts the caller with a panic.
//!
//! A process-wide registry backs [`register_acl_provider`], [`acl_provider`]
//! and [`config_tx_processor`] for code wired during startup; components that
//! can take a registry reference at construction should prefer an explicit
//! instance.
//!
//! ## Invariants
//! - After the first registration exactly one provider is installed for the
//!   lifetime of the registry.
//! - Overrides are consulted first and fully replace the provider for their
//!   resource.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::OnceLock;

use peer_core::ChannelId;

use crate::config_tx::ConfigTxProcessor;
use crate::default_provider::DefaultAclProvider;
use crate::overrides::OverrideTable;
use crate::provider::AclError;
use crate::provider::IdentityInfo;
use crate::provider::PolicyProvider;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry holding the active policy provider and the override table.
pub struct AclRegistry {
    /// Installed provider; set at most once.
    provider: OnceLock<Arc<dyn PolicyProvider>>,
    /// Per-resource overrides.
    overrides: OverrideTable,
    /// Provider installed when `None` is registered.
    fallback: DefaultAclProvider,
}

impl AclRegistry {
    /// Creates an empty registry whose fallback is the deny-by-default provider.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(DefaultAclProvider::default())
    }

    /// Creates an empty registry with a custom fallback provider.
    #[must_use]
    pub const fn with_fallback(fallback: DefaultAclProvider) -> Self {
        Self {
            provider: OnceLock::new(),
            overrides: OverrideTable::new(),
            fallback,
        }
    }

    /// Installs the backing provider. Only the first call has any effect.
    ///
    /// `None` installs the fallback provider. Returns true when this call
    /// performed the registration.
    pub fn register(&self, provider: Option<Arc<dyn PolicyProvider>>) -> bool {
        if self.provider.get().is_some() {
            tracing::debug!("acl provider already registered; ignoring registration");
            return false;
        }
        let is_fallback = provider.is_none();
        let provider = provider.unwrap_or_else(|| Arc::new(self.fallback.clone()));
        let installed = self.provider.set(provider).is_ok();
        if installed {
            tracing::info!(fallback = is_fallback, "acl provider registered");
        } else {
            tracing::debug!("lost acl provider registration race; ignoring registration");
        }
        installed
    }

    /// Returns true once a provider has been registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.provider.get().is_some()
    }

    /// Returns the provider facade, or `None` before registration.
    #[must_use]
    pub fn try_provider(&self) -> Option<AclProviderHandle<'_>> {
        self.provider.get().map(|provider| AclProviderHandle {
            provider,
            overrides: &self.overrides,
        })
    }

    /// Returns the provider facade.
    ///
    /// # Panics
    ///
    /// Panics when called before any registration. Registration must happen
    /// during startup before any access check can run.
    #[must_use]
    #[allow(
        clippy::panic,
        reason = "Requesting the ACL provider before registration is a startup-ordering bug."
    )]
    pub fn provider(&self) -> AclProviderHandle<'_> {
        let Some(handle) = self.try_provider() else {
            tracing::error!("acl provider requested before registration");
            panic!(
                "acl provider requested before registration; register a provider during startup"
            );
        };
        handle
    }

    /// Returns the override table.
    #[must_use]
    pub const fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Returns the config transaction processor gated on this registry.
    #[must_use]
    pub const fn config_tx_processor(&self) -> ConfigTxProcessor<'_> {
        ConfigTxProcessor::new(self)
    }

    /// Clears the registered provider and all overrides.
    #[cfg(any(test, feature = "test-support"))]
    pub fn reset(&mut self) {
        self.provider = OnceLock::new();
        self.overrides.clear();
    }
}

impl Default for AclRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AclRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclRegistry")
            .field("registered", &self.is_registered())
            .field("overrides", &self.overrides)
            .field("fallback", &self.fallback)
            .finish()
    }
}

// ============================================================================
// SECTION: Provider Facade
// ============================================================================

/// Facade over the registered provider that honors overrides.
#[derive(Clone, Copy)]
pub struct AclProviderHandle<'a> {
    /// Registered provider.
    provider: &'a Arc<dyn PolicyProvider>,
    /// Override table consulted first.
    overrides: &'a OverrideTable,
}

impl<'a> AclProviderHandle<'a> {
    /// Checks access, consulting the override for `resource` first.
    ///
    /// # Errors
    ///
    /// Returns [`AclError`] when access is denied or the input is malformed.
    pub fn check_acl(
        &self,
        resource: &str,
        channel: &ChannelId,
        identity: &IdentityInfo<'_>,
    ) -> Result<(), AclError> {
        let overridden = self.overrides.get(resource);
        let result = match &overridden {
            Some(check) => check.check_acl(resource, channel, identity),
            None => self.provider.check_acl(resource, channel, identity),
        };
        log_decision(resource, channel, identity, overridden.is_some(), &result);
        result
    }

    /// Returns the override table backing this facade.
    #[must_use]
    pub const fn overrides(&self) -> &'a OverrideTable {
        self.overrides
    }
}

impl PolicyProvider for AclProviderHandle<'_> {
    fn check_acl(
        &self,
        resource: &str,
        channel: &ChannelId,
        identity: &IdentityInfo<'_>,
    ) -> Result<(), AclError> {
        Self::check_acl(self, resource, channel, identity)
    }
}

impl fmt::Debug for AclProviderHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclProviderHandle")
            .field("overrides", self.overrides)
            .finish_non_exhaustive()
    }
}

/// Emits the decision log line for one check.
fn log_decision(
    resource: &str,
    channel: &ChannelId,
    identity: &IdentityInfo<'_>,
    overridden: bool,
    result: &Result<(), AclError>,
) {
    let shape = identity.shape().as_str();
    match result {
        Ok(()) => tracing::debug!(resource, %channel, shape, overridden, "acl allowed"),
        Err(err) if err.is_malformed() => {
            tracing::warn!(
                resource,
                %channel,
                shape,
                overridden,
                error = %err,
                "acl rejected malformed input"
            );
        }
        Err(err) => {
            tracing::info!(resource, %channel, shape, overridden, error = %err, "acl denied");
        }
    }
}

// ============================================================================
// SECTION: Process-Wide Registry
// ============================================================================

/// Registry shared by the whole process.
static GLOBAL_REGISTRY: LazyLock<AclRegistry> = LazyLock::new(AclRegistry::new);

/// Returns the process-wide registry.
#[must_use]
pub fn global_registry() -> &'static AclRegistry {
    &GLOBAL_REGISTRY
}

/// Registers the process-wide provider. Only the first call has any effect.
///
/// `None` installs the deny-by-default fallback provider.
pub fn register_acl_provider(provider: Option<Arc<dyn PolicyProvider>>) -> bool {
    GLOBAL_REGISTRY.register(provider)
}

/// Returns the process-wide provider facade.
///
/// # Panics
///
/// Panics when no provider has been registered yet.
#[must_use]
pub fn acl_provider() -> AclProviderHandle<'static> {
    GLOBAL_REGISTRY.provider()
}

/// Returns the config transaction processor gated on the process-wide registry.
#[must_use]
pub fn config_tx_processor() -> ConfigTxProcessor<'static> {
    GLOBAL_REGISTRY.config_tx_processor()
}
