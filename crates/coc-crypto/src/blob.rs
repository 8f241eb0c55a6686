//! # Blob References
//!
//! A [`BlobRef`] is the opaque name of one encrypted blob on disk:
//! `{uuid-v4}.bin`. References are generated, never derived from user
//! input, and the format is validated on every construction — a reference
//! that parses is safe to join onto the blob directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CryptoError;

/// A validated reference to an encrypted blob.
///
/// The inner value cannot be mutated after construction, so a `BlobRef`
/// always names a well-formed `{uuid}.bin` path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BlobRef(String);

impl BlobRef {
    /// Generate a fresh random blob reference.
    pub fn random() -> Self {
        Self(format!("{}.bin", Uuid::new_v4()))
    }

    /// Validate an existing reference string.
    pub fn parse(value: impl Into<String>) -> Result<Self, CryptoError> {
        let s = value.into();
        let stem = s
            .strip_suffix(".bin")
            .ok_or_else(|| CryptoError::InvalidBlobRef(format!("missing .bin suffix: {s:?}")))?;
        Uuid::parse_str(stem)
            .map_err(|_| CryptoError::InvalidBlobRef(format!("stem is not a UUID: {s:?}")))?;
        Ok(Self(s))
    }

    /// The reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BlobRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_refs_are_unique_and_valid() {
        let a = BlobRef::random();
        let b = BlobRef::random();
        assert_ne!(a, b);
        assert!(BlobRef::parse(a.as_str()).is_ok());
    }

    #[test]
    fn parse_accepts_uuid_bin() {
        let s = format!("{}.bin", Uuid::new_v4());
        let blob_ref = BlobRef::parse(s.clone()).unwrap();
        assert_eq!(blob_ref.as_str(), s);
    }

    #[test]
    fn parse_rejects_missing_suffix() {
        let s = Uuid::new_v4().to_string();
        assert!(BlobRef::parse(s).is_err());
    }

    #[test]
    fn parse_rejects_non_uuid_stem() {
        assert!(BlobRef::parse("evidence.bin").is_err());
        assert!(BlobRef::parse("../../etc/passwd.bin").is_err());
        assert!(BlobRef::parse(".bin").is_err());
    }

    #[test]
    fn parse_rejects_path_separators() {
        // A traversal attempt cannot survive UUID validation.
        assert!(BlobRef::parse("a/b.bin").is_err());
        assert!(BlobRef::parse("..\\x.bin").is_err());
    }

    #[test]
    fn serde_round_trip_validates() {
        let blob_ref = BlobRef::random();
        let json = serde_json::to_string(&blob_ref).unwrap();
        let back: BlobRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blob_ref);

        let bad: Result<BlobRef, _> = serde_json::from_str("\"not-a-ref\"");
        assert!(bad.is_err());
    }
}
