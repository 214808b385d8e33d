// crates/peer-cli/src/files.rs
// ============================================================================
// Module: Bounded File Input
// Description: Size-limited reads for keys and saved protocol messages.
// Purpose: Fail closed on oversized or unreadable CLI inputs.
// Dependencies: peer-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Every file the CLI reads goes through [`read_bytes_with_limit`], which
//! checks the reported size before reading and the actual size after.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use peer_core::Ed25519Identity;
use peer_core::MspId;
use peer_core::SignedProposal;
use thiserror::Error;

/// Maximum size of a signing key file.
pub const MAX_KEY_FILE_BYTES: usize = 4 * 1024;
/// Maximum size of a saved signed proposal.
pub const MAX_PROPOSAL_FILE_BYTES: usize = 1024 * 1024;

/// Bounded read failures.
#[derive(Debug, Error)]
pub enum ReadLimitError {
    /// File could not be opened or read.
    #[error("{path}: {source}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// File exceeds the size limit.
    #[error("{path}: file size {size} exceeds limit {limit}")]
    TooLarge {
        /// Path being read.
        path: String,
        /// Observed size.
        size: u64,
        /// Allowed size.
        limit: usize,
    },
    /// File contents are not what was expected.
    #[error("{path}: {reason}")]
    Invalid {
        /// Path being read.
        path: String,
        /// Failure detail.
        reason: String,
    },
}

/// Reads a file, failing when it is larger than `max_bytes`.
///
/// # Errors
///
/// Returns [`ReadLimitError`] when the file cannot be read or is too large.
pub fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let display = path.display().to_string();
    let io_err = |source| ReadLimitError::Io {
        path: display.clone(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let size = file.metadata().map_err(io_err)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            path: display,
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(io_err)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            path: display,
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Loads an ed25519 signing identity from a key file.
///
/// # Errors
///
/// Returns [`ReadLimitError`] when the file cannot be read or holds no valid key.
pub fn load_signing_identity(msp_id: &str, path: &Path) -> Result<Ed25519Identity, ReadLimitError> {
    let material = read_bytes_with_limit(path, MAX_KEY_FILE_BYTES)?;
    Ed25519Identity::from_key_material(MspId::new(msp_id), &material).map_err(|err| {
        ReadLimitError::Invalid {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    })
}

/// Loads a signed proposal saved as JSON.
///
/// # Errors
///
/// Returns [`ReadLimitError`] when the file cannot be read or is not a signed proposal.
pub fn load_signed_proposal(path: &Path) -> Result<SignedProposal, ReadLimitError> {
    let bytes = read_bytes_with_limit(path, MAX_PROPOSAL_FILE_BYTES)?;
    serde_json::from_slice(&bytes).map_err(|err| ReadLimitError::Invalid {
        path: path.display().to_string(),
        reason: err.to_string(),
    })
}
