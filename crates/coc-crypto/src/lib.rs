//! # coc-crypto — Cipher Store
//!
//! Encrypted-at-rest storage for evidence binaries.
//!
//! ## Blob Layout
//!
//! Every stored blob is `nonce(12) || ciphertext || tag(16)`, encrypted
//! with AES-256-GCM under the process-wide key from
//! [`coc_core::EngineConfig`]. A fresh random 96-bit nonce is drawn per
//! store call; blobs are write-once (`O_CREAT|O_EXCL`) and never mutated
//! or overwritten.
//!
//! ## Integrity Invariants
//!
//! - Decryption fails closed: a flipped ciphertext byte fails GCM tag
//!   verification and surfaces as [`CryptoError::Integrity`] — altered
//!   plaintext is never returned.
//! - [`CipherStore::retrieve_verified`] additionally recomputes the
//!   plaintext SHA-256 and compares it (constant-time) against the digest
//!   recorded at store time. Callers releasing data to a consumer MUST use
//!   this path.
//!
//! ## Naming
//!
//! Blob references are freshly generated `{uuid-v4}.bin` names — never
//! derived from caller-supplied filenames, so path traversal and
//! collision by name are structurally impossible.

pub mod blob;
pub mod cipher;
pub mod error;

pub use blob::BlobRef;
pub use cipher::{CipherStore, StoredBlob};
pub use error::CryptoError;
