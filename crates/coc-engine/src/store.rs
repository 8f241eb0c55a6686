//! # Shared Engine Store
//!
//! The single in-process source of truth. Each evidence item lives in one
//! [`EvidenceSlot`] behind its own `parking_lot::Mutex` — the per-item
//! mutual-exclusion scope that serializes "read tail, then append" and
//! every transfer check-then-act. Unrelated items never contend.
//!
//! Global uniqueness (case number, composite tag) and transfer routing
//! are DashMap indexes with atomic insert-if-absent reservations.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use coc_core::{EvidenceId, EvidenceTag, TransferId};
use coc_custody::{Custody, TransferLog};
use coc_ledger::{AuditEntry, GENESIS_PREV_HASH};

use crate::catalog::{Analysis, AnalysisFile, EvidenceFile, EvidenceItem};
use crate::error::EngineError;

/// Everything the engine stores about one evidence item.
#[derive(Debug)]
pub(crate) struct EvidenceSlot {
    pub item: EvidenceItem,
    pub files: Vec<EvidenceFile>,
    pub custody: Custody,
    pub transfers: TransferLog,
    pub analyses: Vec<Analysis>,
    pub analysis_files: Vec<AnalysisFile>,
    pub audit: Vec<AuditEntry>,
}

impl EvidenceSlot {
    /// The hash the next audit entry must chain onto.
    pub fn tail_hash(&self) -> &str {
        self.audit
            .last()
            .map(|entry| entry.entry_hash_hex.as_str())
            .unwrap_or(GENESIS_PREV_HASH)
    }

    /// The sequence number of the next audit entry (1-based).
    pub fn next_audit_id(&self) -> u64 {
        self.audit.len() as u64 + 1
    }
}

/// The shared store: per-item slots plus global indexes.
#[derive(Debug, Default)]
pub(crate) struct EngineStore {
    slots: DashMap<EvidenceId, Arc<Mutex<EvidenceSlot>>>,
    case_index: DashMap<String, EvidenceId>,
    tag_index: DashMap<String, EvidenceId>,
    transfer_index: DashMap<TransferId, EvidenceId>,
}

impl EngineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically reserve a case number for an evidence item.
    pub fn reserve_case(&self, case_no: &str, id: EvidenceId) -> Result<(), EngineError> {
        match self.case_index.entry(case_no.to_string()) {
            Entry::Occupied(_) => Err(EngineError::DuplicateCase {
                case_no: case_no.to_string(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(id);
                Ok(())
            }
        }
    }

    /// Release a case reservation (rollback path only).
    pub fn release_case(&self, case_no: &str) {
        self.case_index.remove(case_no);
    }

    /// Atomically reserve a composite tag for an evidence item.
    pub fn reserve_tag(&self, tag: &EvidenceTag, id: EvidenceId) -> Result<(), EngineError> {
        match self.tag_index.entry(tag.as_str().to_string()) {
            Entry::Occupied(_) => Err(EngineError::DuplicateEvidence { tag: tag.clone() }),
            Entry::Vacant(vacant) => {
                vacant.insert(id);
                Ok(())
            }
        }
    }

    /// Release a tag reservation (rollback path only).
    pub fn release_tag(&self, tag: &EvidenceTag) {
        self.tag_index.remove(tag.as_str());
    }

    /// Insert a fully formed slot. Reservations must already be held.
    pub fn insert_slot(&self, slot: EvidenceSlot) {
        let id = slot.item.id;
        self.slots.insert(id, Arc::new(Mutex::new(slot)));
    }

    /// The slot for an evidence item, if registered.
    pub fn slot(&self, id: EvidenceId) -> Option<Arc<Mutex<EvidenceSlot>>> {
        self.slots.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Route a transfer id to its evidence item.
    pub fn index_transfer(&self, transfer_id: TransferId, evidence_id: EvidenceId) {
        self.transfer_index.insert(transfer_id, evidence_id);
    }

    /// The evidence item a transfer belongs to.
    pub fn evidence_for_transfer(&self, transfer_id: TransferId) -> Option<EvidenceId> {
        self.transfer_index.get(&transfer_id).map(|e| *e.value())
    }

    /// Snapshot of all registered slots.
    ///
    /// Collected eagerly so callers never hold a DashMap shard guard
    /// while taking slot locks.
    pub fn all_slots(&self) -> Vec<Arc<Mutex<EvidenceSlot>>> {
        self.slots
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}
