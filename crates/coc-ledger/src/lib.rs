//! # coc-ledger — Hash-Chained Audit Ledger
//!
//! Append-only audit entries per evidence item, forming a singly linked
//! hash chain scoped to that item (not globally):
//!
//! ```text
//! entry_hash = SHA256(prev_hash_hex || canonical_json(payload))
//! payload    = {action, actor_id, details, evidence_id, ts_utc}
//! ```
//!
//! The first entry for an item uses `prev_hash = ""` (genesis). Entries
//! are immutable once appended — tampering with any stored field changes
//! its recomputed hash and breaks the link of every subsequent entry.
//!
//! ## Determinism Contract
//!
//! Verification recomputes hashes from stored payloads, so the
//! canonicalization used at append time is frozen: sorted object keys,
//! compact separators, float rejection (`coc_core::CanonicalBytes`) and
//! second-precision UTC timestamps rendered `%Y-%m-%dT%H:%M:%S+00:00`
//! (`coc_core::time`). This is the single most safety-critical contract
//! in the system.
//!
//! ## Division of Labor
//!
//! This crate builds and verifies entries; it does not own storage or
//! locking. The engine reads the current tail, calls [`build_entry`], and
//! commits entry plus domain mutation as one unit under its per-item
//! lock. [`verify_chain`] is a pure function over stored entries.

pub mod action;
pub mod entry;
pub mod verify;

pub use action::AuditAction;
pub use entry::{build_entry, compute_entry_hash, AuditEntry, LedgerError, GENESIS_PREV_HASH};
pub use verify::{verify_chain, ChainReport, EntryCheck};
