//! # Engine Configuration
//!
//! Process-wide settings (encryption key, upload limits, MIME allow-list)
//! modeled as an explicit immutable object constructed once at startup and
//! passed by reference into the cipher store and registry. There is no
//! ambient global state.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::ValidationError;

/// Default maximum upload size: 25 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Default MIME allow-list for evidence and analysis uploads.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "text/plain",
];

/// A 256-bit AES key, zeroized on drop.
///
/// The raw bytes are only reachable through [`CipherKey::as_bytes`]; the
/// type intentionally has no `Debug`-visible contents and no serde
/// support, so key material cannot leak through logs or serialization.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey([u8; 32]);

impl CipherKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a key from 64 hex characters.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let trimmed = hex.trim();
        if trimmed.len() != 64 {
            return Err(ValidationError::InvalidKeyLength(trimmed.len() / 2));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in trimmed.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| ValidationError::InvalidHex("non-utf8 key hex".to_string()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ValidationError::InvalidHex("non-hex key material".to_string()))?;
        }
        Ok(Self(bytes))
    }

    /// Generate a fresh random key from the OS CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(..)")
    }
}

/// Immutable engine configuration.
///
/// Constructed once at process start; fields are private so the
/// configuration cannot drift after construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    cipher_key: CipherKey,
    max_file_size: usize,
    allowed_mime_types: Vec<String>,
}

impl EngineConfig {
    /// Build a configuration with the default upload limits.
    pub fn new(cipher_key: CipherKey) -> Self {
        Self {
            cipher_key,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Override the maximum upload size (bytes).
    pub fn with_max_file_size(mut self, max: usize) -> Self {
        self.max_file_size = max;
        self
    }

    /// Override the MIME allow-list.
    pub fn with_allowed_mime_types(mut self, mime_types: Vec<String>) -> Self {
        self.allowed_mime_types = mime_types;
        self
    }

    /// The encryption key.
    pub fn cipher_key(&self) -> &CipherKey {
        &self.cipher_key
    }

    /// Maximum accepted upload size in bytes.
    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// The MIME allow-list.
    pub fn allowed_mime_types(&self) -> &[String] {
        &self.allowed_mime_types
    }

    /// Whether a MIME type is on the allow-list (exact match).
    pub fn is_mime_allowed(&self, mime: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cipher_key_hex_round_trip() {
        let key = CipherKey::random();
        let hex: String = key.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
        let parsed = CipherKey::from_hex(&hex).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn cipher_key_rejects_short_hex() {
        assert!(CipherKey::from_hex("deadbeef").is_err());
        assert!(CipherKey::from_hex("").is_err());
    }

    #[test]
    fn cipher_key_rejects_non_hex() {
        let bad = "zz".repeat(32);
        assert!(CipherKey::from_hex(&bad).is_err());
    }

    #[test]
    fn cipher_key_random_is_not_constant() {
        assert_ne!(CipherKey::random().as_bytes(), CipherKey::random().as_bytes());
    }

    #[test]
    fn cipher_key_debug_hides_material() {
        let key = CipherKey::from_bytes([0xAB; 32]);
        let debug = format!("{key:?}");
        assert!(!debug.contains("ab"), "key bytes leaked into Debug: {debug}");
    }

    #[test]
    fn config_defaults() {
        let config = EngineConfig::new(CipherKey::random());
        assert_eq!(config.max_file_size(), DEFAULT_MAX_FILE_SIZE);
        assert!(config.is_mime_allowed("application/pdf"));
        assert!(config.is_mime_allowed("text/plain"));
        assert!(!config.is_mime_allowed("application/x-msdownload"));
    }

    #[test]
    fn config_overrides() {
        let config = EngineConfig::new(CipherKey::random())
            .with_max_file_size(1024)
            .with_allowed_mime_types(vec!["image/tiff".to_string()]);
        assert_eq!(config.max_file_size(), 1024);
        assert!(config.is_mime_allowed("image/tiff"));
        assert!(!config.is_mime_allowed("application/pdf"));
    }

    #[test]
    fn mime_match_is_exact() {
        let config = EngineConfig::new(CipherKey::random());
        assert!(!config.is_mime_allowed("application/pdf; charset=binary"));
        assert!(!config.is_mime_allowed("APPLICATION/PDF"));
    }
}
