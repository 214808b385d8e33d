// crates/peer-core/src/core/encoding.rs
// ============================================================================
// Module: Byte Field Encoding
// Description: Serde helpers that encode byte fields as base64 strings.
// Purpose: Keep signed payloads and signatures readable in JSON wire forms.
// Dependencies: base64, serde
// ============================================================================

//! ## Overview
//! Protocol messages carry opaque byte fields (serialized proposals,
//! signatures, creators). They serialize as standard base64 strings and are
//! used through `#[serde(with = "crate::core::encoding::base64_bytes")]`.

/// Base64 (standard alphabet, padded) serde adapter for `Vec<u8>` fields.
pub mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    /// Serializes bytes as a base64 string.
    ///
    /// # Errors
    ///
    /// Returns the serializer error when writing the string fails.
    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    /// Deserializes bytes from a base64 string.
    ///
    /// # Errors
    ///
    /// Returns a custom error when the input is not valid base64.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        BASE64.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}
