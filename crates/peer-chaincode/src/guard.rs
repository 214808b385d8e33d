// crates/peer-chaincode/src/guard.rs
// ============================================================================
// Module: Broadcast Guard
// Description: Scoped release of the broadcast client.
// Purpose: Close the ordering client exactly once on every exit path.
// Dependencies: peer-core, tracing
// ============================================================================

//! ## Overview
//! [`BroadcastGuard`] closes its client when dropped, which covers early
//! returns, errors, and unwinding alike. Close failures are logged and never
//! replace the deployment result.

use peer_core::BroadcastClient;

/// Closes a broadcast client when dropped.
pub struct BroadcastGuard<'a> {
    /// Client released on drop.
    client: &'a dyn BroadcastClient,
}

impl<'a> BroadcastGuard<'a> {
    /// Takes responsibility for closing `client`.
    #[must_use = "the client is closed when the guard is dropped"]
    pub const fn new(client: &'a dyn BroadcastClient) -> Self {
        Self {
            client,
        }
    }
}

impl Drop for BroadcastGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.client.close() {
            tracing::warn!(error = %err, "failed to close broadcast client");
        }
    }
}
