//! # Encrypted Blob Store
//!
//! Stores binary payloads encrypted with AES-256-GCM under a process-wide
//! key. One blob file per store call; write-once semantics via
//! `OpenOptions::create_new`, eliminating the TOCTOU race between exists()
//! and write() under concurrent access.
//!
//! ## On-Disk Format
//!
//! ```text
//! nonce (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! Retrieval splits by fixed offsets, so a blob shorter than
//! `nonce + tag` is structurally corrupt and reported as an integrity
//! fault, not an I/O error.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use coc_core::{sha256_bytes, CipherKey, ContentDigest};

use crate::blob::BlobRef;
use crate::error::CryptoError;

/// GCM nonce length in bytes (96 bits).
const NONCE_LEN: usize = 12;
/// GCM authentication tag length in bytes (128 bits).
const TAG_LEN: usize = 16;

/// Result of storing a payload: where it lives and what it hashed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Opaque reference to the encrypted blob.
    pub blob_ref: BlobRef,
    /// SHA-256 digest of the plaintext.
    pub digest: ContentDigest,
    /// Plaintext size in bytes.
    pub size_bytes: usize,
}

/// An AES-256-GCM encrypted blob store rooted at a directory.
pub struct CipherStore {
    cipher: Aes256Gcm,
    base_dir: PathBuf,
}

impl CipherStore {
    /// Create a store over the given key and blob directory.
    ///
    /// The directory does not need to exist yet; it is created on the
    /// first [`store()`](CipherStore::store) call.
    pub fn new(key: &CipherKey, base_dir: impl Into<PathBuf>) -> Self {
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        Self {
            cipher,
            base_dir: base_dir.into(),
        }
    }

    /// The blob directory root.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The filesystem path a reference resolves to.
    pub fn path_for(&self, blob_ref: &BlobRef) -> PathBuf {
        self.base_dir.join(blob_ref.as_str())
    }

    /// Encrypt and persist a payload under a fresh random reference.
    ///
    /// Returns the reference and the SHA-256 digest of the plaintext.
    /// Empty payloads are valid: the blob then carries only nonce and tag.
    pub fn store(&self, plaintext: &[u8]) -> Result<StoredBlob, CryptoError> {
        let digest = sha256_bytes(plaintext);

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        // encrypt() returns ciphertext || tag.
        let sealed = self
            .cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::Integrity("encryption failed".to_string()))?;

        let blob_ref = BlobRef::random();
        fs::create_dir_all(&self.base_dir)?;
        let path = self.path_for(&blob_ref);

        // Fresh random name per call: create_new both enforces write-once
        // and surfaces the (astronomically unlikely) name collision.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(&nonce_bytes)?;
        file.write_all(&sealed)?;

        tracing::debug!(blob_ref = %blob_ref, size_bytes = plaintext.len(), "stored encrypted blob");

        Ok(StoredBlob {
            blob_ref,
            digest,
            size_bytes: plaintext.len(),
        })
    }

    /// Read and decrypt a blob.
    ///
    /// Fails with [`CryptoError::NotFound`] when the reference does not
    /// resolve, and [`CryptoError::Integrity`] when the blob is too short
    /// or fails GCM tag verification.
    pub fn retrieve(&self, blob_ref: &BlobRef) -> Result<Vec<u8>, CryptoError> {
        let path = self.path_for(blob_ref);
        let sealed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CryptoError::NotFound(blob_ref.as_str().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CryptoError::Integrity(format!(
                "blob {blob_ref} is truncated"
            )));
        }

        let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher.decrypt(nonce, body).map_err(|_| {
            tracing::error!(blob_ref = %blob_ref, "GCM tag verification failed");
            CryptoError::Integrity(format!("blob {blob_ref} failed authentication"))
        })
    }

    /// Retrieve a blob and verify its plaintext against the digest
    /// recorded at store time.
    ///
    /// This is the only retrieval path that may release data to a
    /// consumer. The comparison is constant-time over the raw 32-byte
    /// digests.
    pub fn retrieve_verified(
        &self,
        blob_ref: &BlobRef,
        expected: &ContentDigest,
    ) -> Result<Vec<u8>, CryptoError> {
        let plaintext = self.retrieve(blob_ref)?;
        let recomputed = sha256_bytes(&plaintext);
        if !bool::from(recomputed.as_bytes().ct_eq(expected.as_bytes())) {
            tracing::error!(blob_ref = %blob_ref, "plaintext digest mismatch after decrypt");
            return Err(CryptoError::Integrity(format!(
                "blob {blob_ref} digest mismatch"
            )));
        }
        Ok(plaintext)
    }

    /// Whether a blob exists on disk.
    pub fn contains(&self, blob_ref: &BlobRef) -> bool {
        self.path_for(blob_ref).exists()
    }
}

impl std::fmt::Debug for CipherStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose cipher/key state.
        f.debug_struct("CipherStore")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}
