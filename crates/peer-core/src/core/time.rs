// crates/peer-core/src/core/time.rs
// ============================================================================
// Module: Peer Time Helpers
// Description: Wall-clock timestamps embedded in channel headers.
// Purpose: Provide one place where protocol code reads the system clock.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Channel headers carry the proposal creation time as unix milliseconds.
//! Builders accept explicit timestamps so tests stay deterministic; only the
//! call sites that create fresh proposals read the clock through
//! [`now_unix_millis`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Returns the current unix time in milliseconds, saturating on overflow.
///
/// A clock set before the unix epoch yields zero.
#[must_use]
pub fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
