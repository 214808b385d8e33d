// crates/peer-core/src/core/context.rs
// ============================================================================
// Module: Request Context
// Description: Cancellation and deadline carrier for network round trips.
// Purpose: Let callers bound or abort endorser and broadcast calls.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`RequestContext`] is handed to every network client call. It carries an
//! optional deadline and a shared cancellation flag. Clients refuse to start a
//! call once the context is done; the deployment flow itself never imposes a
//! timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Cancellable request context for network calls.
///
/// # Invariants
/// - Clones share the cancellation flag; cancelling one cancels all.
/// - Once cancelled, a context never becomes live again.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Optional absolute deadline.
    deadline: Option<Instant>,
    /// Shared cancellation flag.
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    /// Returns a context with no deadline that is never cancelled unless asked.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a child context sharing cancellation, bounded by `timeout`.
    ///
    /// The earlier of the existing and the new deadline wins.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now().checked_add(timeout);
        let deadline = match (self.deadline, candidate) {
            (Some(current), Some(next)) => Some(current.min(next)),
            (Some(current), None) => Some(current),
            (None, next) => next,
        };
        Self {
            deadline,
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Cancels the context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true when the context was cancelled or its deadline passed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns the time left before the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
