//! # Validation Error Types
//!
//! Structured validation errors for domain-primitive construction.
//! Uses `thiserror` for ergonomic error definitions with diagnostic context.

use thiserror::Error;

/// Errors from validating domain primitives at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An evidence tag segment was empty or contained whitespace.
    #[error("invalid evidence tag: {0}")]
    InvalidEvidenceTag(String),

    /// A timestamp string did not parse as RFC 3339 / ISO-8601.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A role string did not name a known role.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A hex string was malformed or had the wrong length.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A cipher key had the wrong length.
    #[error("invalid cipher key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),
}
