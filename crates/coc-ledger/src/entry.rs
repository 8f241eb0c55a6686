//! # Audit Entry Construction
//!
//! Builds hash-chained [`AuditEntry`] values. The canonical payload and
//! hash recipe live here and in [`crate::verify`] only — no other code in
//! the workspace computes entry hashes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use coc_core::time::{canonical_ts, truncate_to_second};
use coc_core::{sha256_bytes, CanonicalBytes, CanonicalizationError, EvidenceId, UserId};

use crate::action::AuditAction;

/// The `prev_hash` of the first entry in every chain.
pub const GENESIS_PREV_HASH: &str = "";

/// Errors from ledger entry construction.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The entry details could not be canonicalized (e.g. contained a
    /// float).
    #[error("entry payload canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// One immutable entry in an evidence item's audit chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Per-item monotonic sequence number, starting at 1. Insertion order
    /// anchor alongside the hash chain.
    pub id: u64,
    /// The evidence item this entry belongs to.
    pub evidence_id: EvidenceId,
    /// Who performed the action.
    pub actor_id: UserId,
    /// What happened.
    pub action: AuditAction,
    /// Structured action context (JSON object; floats rejected).
    pub details: serde_json::Value,
    /// When, at second precision UTC.
    pub ts_utc: DateTime<Utc>,
    /// The previous entry's hash, or `""` for the genesis entry.
    pub prev_hash_hex: String,
    /// This entry's hash over `prev_hash_hex || canonical_payload`.
    pub entry_hash_hex: String,
}

impl AuditEntry {
    /// Rebuild this entry's canonical payload from its stored fields.
    ///
    /// Used by verification to recompute the expected hash; must stay in
    /// lockstep with the payload built at append time.
    pub fn canonical_payload(&self) -> Result<CanonicalBytes, LedgerError> {
        canonical_payload(
            &self.evidence_id,
            &self.actor_id,
            self.action,
            &self.details,
            self.ts_utc,
        )
    }
}

/// Build the canonical payload for an entry.
///
/// The payload is a five-field JSON object; `CanonicalBytes` sorts the
/// keys, so the serialized order is `action`, `actor_id`, `details`,
/// `evidence_id`, `ts_utc` regardless of construction order here.
fn canonical_payload(
    evidence_id: &EvidenceId,
    actor_id: &UserId,
    action: AuditAction,
    details: &serde_json::Value,
    ts_utc: DateTime<Utc>,
) -> Result<CanonicalBytes, LedgerError> {
    let payload = json!({
        "evidence_id": evidence_id,
        "actor_id": actor_id,
        "action": action.as_str(),
        "details": details,
        "ts_utc": canonical_ts(ts_utc),
    });
    Ok(CanonicalBytes::from_value(payload)?)
}

/// Compute an entry hash: `SHA256(prev_hash_hex || canonical_payload)`.
pub fn compute_entry_hash(prev_hash_hex: &str, payload: &CanonicalBytes) -> String {
    let mut combined = Vec::with_capacity(prev_hash_hex.len() + payload.len());
    combined.extend_from_slice(prev_hash_hex.as_bytes());
    combined.extend_from_slice(payload.as_bytes());
    sha256_bytes(&combined).to_hex()
}

/// Construct a fully hashed entry chained onto `prev_hash_hex`.
///
/// `ts_utc` is truncated to second precision before hashing so the stored
/// timestamp and the hashed rendering can never disagree. The caller
/// supplies the per-item sequence number and the current tail hash (or
/// [`GENESIS_PREV_HASH`]) read under its per-item lock.
pub fn build_entry(
    id: u64,
    evidence_id: EvidenceId,
    actor_id: UserId,
    action: AuditAction,
    details: serde_json::Value,
    ts_utc: DateTime<Utc>,
    prev_hash_hex: &str,
) -> Result<AuditEntry, LedgerError> {
    let ts_utc = truncate_to_second(ts_utc);
    let payload = canonical_payload(&evidence_id, &actor_id, action, &details, ts_utc)?;
    let entry_hash_hex = compute_entry_hash(prev_hash_hex, &payload);
    Ok(AuditEntry {
        id,
        evidence_id,
        actor_id,
        action,
        details,
        ts_utc,
        prev_hash_hex: prev_hash_hex.to_string(),
        entry_hash_hex,
    })
}
