//! # Cryptographic Error Types
//!
//! Structured errors for the cipher store. The integrity variant is kept
//! distinct from not-found and I/O failures: callers must be able to tell
//! "this blob was tampered with" apart from "this blob is missing".

use thiserror::Error;

/// Errors from cipher store operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Authentication-tag or plaintext-digest verification failed.
    ///
    /// The display string is deliberately generic — it never includes key
    /// material, nonces, or digest values.
    #[error("corruption detected: {0}")]
    Integrity(String),

    /// The referenced blob does not exist.
    #[error("blob not found: {0}")]
    NotFound(String),

    /// A blob reference string was malformed.
    #[error("invalid blob reference: {0}")]
    InvalidBlobRef(String),

    /// I/O error touching the blob directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
