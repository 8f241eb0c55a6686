//! # Chain Verification
//!
//! A pure walk over stored entries in insertion order, recomputing the
//! expected `prev_hash` linkage and each `entry_hash` from the stored
//! payload. A mismatch flips the aggregate verdict but never aborts the
//! walk — every entry is evaluated and reported for diagnostics, and a
//! break at entry N cascades: entries N+1.. fail their `prev_hash` check
//! against the recomputed chain head.

use serde::{Deserialize, Serialize};

use coc_core::time::display_ts;

use crate::action::AuditAction;
use crate::entry::{compute_entry_hash, AuditEntry, GENESIS_PREV_HASH};

/// Verification result for a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCheck {
    /// The entry's per-item sequence number.
    pub entry_id: u64,
    /// The entry's action tag.
    pub action: AuditAction,
    /// The entry's timestamp (display rendering).
    pub ts_utc: String,
    /// Whether the stored `prev_hash` equals the previous entry's stored
    /// `entry_hash` (or `""` for the first entry).
    pub prev_hash_valid: bool,
    /// Whether the stored `entry_hash` equals the hash recomputed from
    /// the stored payload.
    pub entry_hash_valid: bool,
    /// Conjunction of the two checks.
    pub valid: bool,
    /// The linkage value this entry was expected to carry.
    pub expected_prev_hash: String,
    /// The linkage value this entry actually carries.
    pub actual_prev_hash: String,
    /// The recomputed entry hash.
    pub expected_entry_hash: String,
    /// The stored entry hash.
    pub actual_entry_hash: String,
}

/// Aggregate verification report for one evidence item's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainReport {
    /// Whether every entry verified. A chain with zero entries is
    /// vacuously valid.
    pub valid: bool,
    /// Number of entries walked.
    pub total_entries: usize,
    /// Per-entry diagnostics, in insertion order.
    pub entries: Vec<EntryCheck>,
}

/// Verify a chain of entries in insertion order.
///
/// Callers pass the full stored sequence for one evidence item. If an
/// entry's payload cannot be re-canonicalized (possible only if the
/// stored details were corrupted into something non-canonical, e.g. a
/// float), the entry is reported invalid with an empty recomputed hash
/// rather than failing the whole walk.
pub fn verify_chain(entries: &[AuditEntry]) -> ChainReport {
    let mut checks = Vec::with_capacity(entries.len());
    let mut valid = true;
    let mut expected_prev_hash = GENESIS_PREV_HASH.to_string();

    for entry in entries {
        let prev_hash_valid = entry.prev_hash_hex == expected_prev_hash;

        let expected_entry_hash = match entry.canonical_payload() {
            Ok(payload) => compute_entry_hash(&entry.prev_hash_hex, &payload),
            Err(_) => String::new(),
        };
        let entry_hash_valid =
            !expected_entry_hash.is_empty() && entry.entry_hash_hex == expected_entry_hash;

        let entry_valid = prev_hash_valid && entry_hash_valid;
        if !entry_valid {
            valid = false;
        }

        checks.push(EntryCheck {
            entry_id: entry.id,
            action: entry.action,
            ts_utc: display_ts(entry.ts_utc),
            prev_hash_valid,
            entry_hash_valid,
            valid: entry_valid,
            expected_prev_hash: expected_prev_hash.clone(),
            actual_prev_hash: entry.prev_hash_hex.clone(),
            expected_entry_hash,
            actual_entry_hash: entry.entry_hash_hex.clone(),
        });

        // The next entry must link to what is actually stored here, so a
        // single corrupted entry surfaces at itself and at its successor.
        expected_prev_hash = entry.entry_hash_hex.clone();
    }

    ChainReport {
        valid,
        total_entries: entries.len(),
        entries: checks,
    }
}
