//! # SHA-256 Content Digests
//!
//! [`ContentDigest`] is the 32-byte SHA-256 digest type used for both
//! canonical-structure hashing (audit ledger) and raw-payload hashing
//! (plaintext file digests).
//!
//! Two construction paths exist on purpose:
//!
//! - [`sha256_digest`] takes [`CanonicalBytes`] — structured data must be
//!   canonicalized before hashing, so a digest of a structure is always a
//!   digest of its canonical form.
//! - [`sha256_bytes`] takes raw bytes — binary payloads (file contents)
//!   have no canonical form; their digest is over the bytes as uploaded.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::ValidationError;

/// A SHA-256 content digest (32 bytes), serialized as 64 lowercase hex chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a digest from a 64-char hex string.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let trimmed = hex.trim();
        if trimmed.len() != 64 {
            return Err(ValidationError::InvalidHex(format!(
                "digest must be 64 hex chars, got {}",
                trimmed.len()
            )));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in trimmed.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| ValidationError::InvalidHex(trimmed.to_string()))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| ValidationError::InvalidHex(trimmed.to_string()))?;
        }
        Ok(Self(bytes))
    }

    /// The all-zero digest, useful as a sentinel in tests.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// The raw 32 digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in &self.0 {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// The signature requires [`CanonicalBytes`] — raw byte slices are not
/// accepted here, preventing a canonicalization split between hashing
/// call sites.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    sha256_bytes(data.as_bytes())
}

/// Compute a SHA-256 digest over raw bytes.
///
/// For binary payloads (file plaintext) only; structured data goes
/// through [`sha256_digest`].
pub fn sha256_bytes(data: &[u8]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    ContentDigest(hasher.finalize().into())
}
