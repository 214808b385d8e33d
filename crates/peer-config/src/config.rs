// crates/peer-config/src/config.rs
// ============================================================================
// Module: Peer Configuration
// Description: Configuration loading and validation for the peer tooling.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: peer-acl, peer-chaincode, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, the `PEER_CONFIG` environment variable, or
//! `peer.toml` in the working directory. Only the implicit default file may be
//! absent, in which case defaults apply; an explicitly named file that cannot
//! be loaded is an error.
//!
//! Security posture: config inputs are untrusted. Unknown fields are rejected
//! and the ACL baseline defaults to deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use peer_acl::AclConfig;
use peer_chaincode::DEFAULT_ESCC;
use peer_chaincode::DEFAULT_VSCC;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "peer.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PEER_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default endorser endpoint.
const DEFAULT_ENDORSER_URL: &str = "http://127.0.0.1:7051";
/// Default ordering service endpoint.
const DEFAULT_ORDERER_URL: &str = "http://127.0.0.1:7050";
/// Default connect timeout in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
/// Minimum connect timeout in milliseconds.
const MIN_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum connect timeout in milliseconds.
const MAX_CONNECT_TIMEOUT_MS: u64 = 60_000;
/// Default request timeout in milliseconds.
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Minimum request timeout in milliseconds.
const MIN_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum request timeout in milliseconds.
const MAX_REQUEST_TIMEOUT_MS: u64 = 300_000;
/// Default maximum response size in bytes.
const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Minimum configurable response size in bytes.
const MIN_RESPONSE_BYTES: usize = 1024;
/// Maximum configurable response size in bytes.
const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Default MSP identifier.
const DEFAULT_MSP_ID: &str = "DEFAULT";
/// Maximum length of an MSP identifier or system chaincode name.
const MAX_NAME_LENGTH: usize = 128;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Peer tooling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerConfig {
    /// Network endpoints and client limits.
    #[serde(default)]
    pub peer: PeerSection,
    /// Signing identity settings.
    #[serde(default)]
    pub identity: IdentitySection,
    /// Access-control settings.
    #[serde(default)]
    pub acl: AclConfig,
    /// Chaincode deployment defaults.
    #[serde(default)]
    pub chaincode: ChaincodeSection,
}

/// `[peer]` section: endpoints and client limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerSection {
    /// Endorser base URL.
    #[serde(default = "default_endorser_url")]
    pub endorser_url: String,
    /// Ordering service base URL.
    #[serde(default = "default_orderer_url")]
    pub orderer_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Maximum accepted response body size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for PeerSection {
    fn default() -> Self {
        Self {
            endorser_url: default_endorser_url(),
            orderer_url: default_orderer_url(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl PeerSection {
    /// Validates endpoints and limits.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("peer.endorser_url", &self.endorser_url)?;
        validate_http_url("peer.orderer_url", &self.orderer_url)?;
        validate_range(
            "peer.connect_timeout_ms",
            self.connect_timeout_ms,
            MIN_CONNECT_TIMEOUT_MS,
            MAX_CONNECT_TIMEOUT_MS,
        )?;
        validate_range(
            "peer.request_timeout_ms",
            self.request_timeout_ms,
            MIN_REQUEST_TIMEOUT_MS,
            MAX_REQUEST_TIMEOUT_MS,
        )?;
        if self.max_response_bytes < MIN_RESPONSE_BYTES
            || self.max_response_bytes > MAX_RESPONSE_BYTES
        {
            return Err(ConfigError::Invalid(format!(
                "peer.max_response_bytes must be between {MIN_RESPONSE_BYTES} and \
                 {MAX_RESPONSE_BYTES}"
            )));
        }
        Ok(())
    }
}

/// `[identity]` section: who signs proposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentitySection {
    /// MSP the signing identity belongs to.
    #[serde(default = "default_msp_id")]
    pub msp_id: String,
    /// Path to the ed25519 secret key (32 raw bytes or base64 text).
    #[serde(default)]
    pub signing_key_path: Option<PathBuf>,
}

impl Default for IdentitySection {
    fn default() -> Self {
        Self {
            msp_id: default_msp_id(),
            signing_key_path: None,
        }
    }
}

impl IdentitySection {
    /// Validates the identity settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("identity.msp_id", &self.msp_id)?;
        if let Some(path) = &self.signing_key_path {
            validate_path_string("identity.signing_key_path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

/// `[chaincode]` section: deployment defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChaincodeSection {
    /// Default endorsement system chaincode.
    #[serde(default = "default_escc")]
    pub escc: String,
    /// Default validation system chaincode.
    #[serde(default = "default_vscc")]
    pub vscc: String,
}

impl Default for ChaincodeSection {
    fn default() -> Self {
        Self {
            escc: default_escc(),
            vscc: default_vscc(),
        }
    }
}

impl ChaincodeSection {
    /// Validates the system chaincode names.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("chaincode.escc", &self.escc)?;
        validate_name("chaincode.vscc", &self.vscc)
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

impl PeerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path)?;
        Self::load_resolved(&resolved, explicit)
    }

    /// Loads a resolved path; a missing implicit default yields defaults.
    fn load_resolved(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {
                let mut config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", path.display())));
            }
        };
        Self::from_toml_bytes(&bytes)
    }

    /// Parses and validates configuration from TOML bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bytes are too large, not UTF-8, not
    /// valid TOML, or fail validation.
    pub fn from_toml_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.peer.endorser_url = self.peer.endorser_url.trim().to_string();
        self.peer.orderer_url = self.peer.orderer_url.trim().to_string();
        self.peer.validate()?;
        self.identity.validate()?;
        self.acl.validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.chaincode.validate()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path and whether it was named explicitly.
fn resolve_path(path: Option<&Path>) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates an http(s) endpoint URL.
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::Invalid(format!("{field} must include a host")));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not embed credentials")));
    }
    Ok(())
}

/// Validates a value against inclusive bounds.
fn validate_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min} and {max} milliseconds"
        )));
    }
    Ok(())
}

/// Validates a short identifier.
fn validate_name(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_NAME_LENGTH} characters")));
    }
    Ok(())
}

/// Default endorser URL.
fn default_endorser_url() -> String {
    DEFAULT_ENDORSER_URL.to_string()
}

/// Default orderer URL.
fn default_orderer_url() -> String {
    DEFAULT_ORDERER_URL.to_string()
}

/// Default connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

/// Default request timeout.
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Default response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default MSP identifier.
fn default_msp_id() -> String {
    DEFAULT_MSP_ID.to_string()
}

/// Default endorsement system chaincode.
fn default_escc() -> String {
    DEFAULT_ESCC.to_string()
}

/// Default validation system chaincode.
fn default_vscc() -> String {
    DEFAULT_VSCC.to_string()
}
