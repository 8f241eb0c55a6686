//! # coc-core — Foundational Types
//!
//! Shared vocabulary for the Custody Integrity Engine:
//!
//! - [`CanonicalBytes`]: the single canonical JSON form used as hashing
//!   input everywhere in the workspace (sorted keys, compact separators,
//!   float rejection).
//! - [`ContentDigest`] and [`sha256_digest`] / [`sha256_bytes`]: SHA-256
//!   content digests for canonical structures and raw binary payloads.
//! - Identifier newtypes ([`EvidenceId`], [`UserId`], [`FileId`],
//!   [`TransferId`], [`AnalysisId`], [`EvidenceTag`]) — each identifier is
//!   a distinct type, so an analysis id cannot be passed where a transfer
//!   id is expected.
//! - [`Actor`] and [`Role`]: the pre-authenticated caller identity the
//!   engine receives from its (out-of-scope) transport layer.
//! - [`EngineConfig`] and [`CipherKey`]: immutable process-wide
//!   configuration, constructed once and passed by reference — no ambient
//!   global state.
//! - Timestamp canonicalization ([`time`]): second-precision truncation and
//!   the frozen `%Y-%m-%dT%H:%M:%S+00:00` rendering used by the ledger.

pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;
pub mod time;

pub use canonical::{CanonicalBytes, CanonicalizationError};
pub use config::{CipherKey, EngineConfig};
pub use digest::{sha256_bytes, sha256_digest, ContentDigest};
pub use error::ValidationError;
pub use identity::{Actor, AnalysisId, EvidenceId, EvidenceTag, FileId, Role, TransferId, UserId};
