//! # Engine Operations
//!
//! The audited domain operations. Every mutating operation follows the
//! same shape:
//!
//! 1. take the evidence item's slot lock,
//! 2. run every fallible step — authorization, validation, decryption,
//!    state-machine transition on a working copy, audit-entry
//!    construction against the current tail hash,
//! 3. commit the in-memory writes (infallible) and release the lock.
//!
//! The audit append is therefore atomic with the mutation it documents,
//! and per-item appends are totally ordered.

use std::path::PathBuf;

use serde_json::json;

use coc_core::time::utc_now_second;
use coc_core::{
    Actor, AnalysisId, EngineConfig, EvidenceId, EvidenceTag, FileId, TransferId, UserId,
};
use coc_crypto::CipherStore;
use coc_custody::{Custody, Transfer, TransferLog};
use coc_ledger::{build_entry, verify_chain, AuditAction, AuditEntry, ChainReport};

use crate::catalog::{
    require_text, validate_uploads, Analysis, AnalysisFile, AnalysisRecord, EvidenceFile,
    EvidenceItem, EvidenceRecord, FileContents, FileUpload, NewAnalysis, NewEvidence,
};
use crate::error::EngineError;
use crate::policy::{can_perform, EvidenceAction, ResourceView};
use crate::store::{EngineStore, EvidenceSlot};

/// The Custody Integrity Engine.
///
/// One instance per process; shared across request workers by reference
/// (`&self` on every operation).
pub struct CustodyEngine {
    config: EngineConfig,
    cipher: CipherStore,
    store: EngineStore,
}

impl CustodyEngine {
    /// Build an engine over a blob directory, using the configuration's
    /// cipher key.
    pub fn new(config: EngineConfig, blob_dir: impl Into<PathBuf>) -> Self {
        let cipher = CipherStore::new(config.cipher_key(), blob_dir);
        Self {
            config,
            cipher,
            store: EngineStore::new(),
        }
    }

    /// The engine's immutable configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Evidence registry ────────────────────────────────────────────

    /// Register a new evidence item with at least one attached file.
    ///
    /// The creator becomes the initial custodian; the item's audit chain
    /// starts with an `EVIDENCE_CREATED` genesis entry.
    pub fn create_evidence(
        &self,
        actor: &Actor,
        new: NewEvidence,
        files: Vec<FileUpload>,
    ) -> Result<EvidenceRecord, EngineError> {
        if !can_perform(actor, EvidenceAction::CreateEvidence, &ResourceView::none()) {
            tracing::warn!(actor = %actor.id, role = %actor.role, "evidence creation denied");
            return Err(EngineError::RoleForbidden {
                role: actor.role,
                action: "create evidence",
            });
        }
        if files.is_empty() {
            return Err(EngineError::Validation(
                "at least one file must be attached".to_string(),
            ));
        }
        validate_uploads(&self.config, &files)?;
        require_text("offense", &new.offense)?;
        require_text("badge_no", &new.badge_no)?;
        require_text("location", &new.location)?;
        require_text("description", &new.description)?;

        let tag = EvidenceTag::compose(&new.agency, &new.case_no, &new.item_no)?;
        let case_no = new.case_no.trim().to_string();
        let evidence_id = EvidenceId::new();

        // Reserve both uniqueness keys before doing any expensive work;
        // roll the first back if the second is taken.
        self.store.reserve_case(&case_no, evidence_id)?;
        if let Err(err) = self.store.reserve_tag(&tag, evidence_id) {
            self.store.release_case(&case_no);
            return Err(err);
        }

        let now = utc_now_second();
        let mut stored_files = Vec::with_capacity(files.len());
        let mut file_details = Vec::with_capacity(files.len());
        for upload in &files {
            let stored = match self.cipher.store(&upload.bytes) {
                Ok(stored) => stored,
                Err(err) => {
                    // Already-written blobs are unreferenced and harmless;
                    // the uniqueness reservations must not survive.
                    self.store.release_case(&case_no);
                    self.store.release_tag(&tag);
                    return Err(err.into());
                }
            };
            file_details.push(json!({
                "filename": upload.filename,
                "mime": upload.mime,
                "size_bytes": stored.size_bytes,
                "sha256": stored.digest.to_hex(),
            }));
            stored_files.push(EvidenceFile {
                id: FileId::new(),
                evidence_id,
                orig_filename: upload.filename.clone(),
                mime: upload.mime.clone(),
                size_bytes: stored.size_bytes as u64,
                sha256: stored.digest,
                blob_ref: stored.blob_ref,
                created_at_utc: now,
            });
        }

        let item = EvidenceItem {
            id: evidence_id,
            tag: tag.clone(),
            agency: new.agency.trim().to_string(),
            case_no,
            offense: new.offense,
            item_no: new.item_no.trim().to_string(),
            badge_no: new.badge_no,
            location: new.location,
            description: new.description,
            collected_by: actor.id,
            collected_at_utc: new.collected_at_utc,
            created_at_utc: now,
        };

        let genesis = match build_entry(
            1,
            evidence_id,
            actor.id,
            AuditAction::EvidenceCreated,
            json!({
                "evidence_tag": tag.as_str(),
                "files": file_details,
            }),
            now,
            coc_ledger::GENESIS_PREV_HASH,
        ) {
            Ok(entry) => entry,
            Err(err) => {
                self.store.release_case(&item.case_no);
                self.store.release_tag(&tag);
                return Err(err.into());
            }
        };

        let slot = EvidenceSlot {
            item,
            files: stored_files,
            custody: Custody::grant(evidence_id, actor.id, now),
            transfers: TransferLog::new(),
            analyses: Vec::new(),
            analysis_files: Vec::new(),
            audit: vec![genesis],
        };
        let record = record_from(&slot);
        self.store.insert_slot(slot);

        tracing::info!(evidence_id = %evidence_id, tag = %tag, actor = %actor.id, "evidence created");
        Ok(record)
    }

    /// Read one evidence item. AUDITOR sees all; others must be the
    /// creator or current custodian.
    pub fn get_evidence(
        &self,
        actor: &Actor,
        evidence_id: EvidenceId,
    ) -> Result<EvidenceRecord, EngineError> {
        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let slot = slot_arc.lock();

        let resource = resource_view(&slot);
        if !can_perform(actor, EvidenceAction::ViewEvidence, &resource) {
            return Err(EngineError::ViewDenied {
                user_id: actor.id,
                evidence_id,
            });
        }
        Ok(record_from(&slot))
    }

    /// List evidence visible to the caller, oldest first.
    pub fn list_evidence(&self, actor: &Actor) -> Vec<EvidenceRecord> {
        let mut records: Vec<EvidenceRecord> = self
            .store
            .all_slots()
            .iter()
            .filter_map(|slot_arc| {
                let slot = slot_arc.lock();
                can_perform(actor, EvidenceAction::ViewEvidence, &resource_view(&slot))
                    .then(|| record_from(&slot))
            })
            .collect();
        records.sort_by(|a, b| {
            a.item
                .created_at_utc
                .cmp(&b.item.created_at_utc)
                .then_with(|| a.item.tag.as_str().cmp(b.item.tag.as_str()))
        });
        records
    }

    /// Decrypt and release an evidence file to the current custodian.
    ///
    /// The plaintext digest recorded at store time is re-verified before
    /// release, and the access itself is audited.
    pub fn download_evidence_file(
        &self,
        actor: &Actor,
        evidence_id: EvidenceId,
        file_id: FileId,
    ) -> Result<FileContents, EngineError> {
        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let mut slot = slot_arc.lock();

        let file = slot
            .files
            .iter()
            .find(|f| f.id == file_id)
            .cloned()
            .ok_or(EngineError::FileNotFound(file_id))?;

        self.ensure_custodian(actor, &slot, "download evidence file")?;

        let bytes = self.cipher.retrieve_verified(&file.blob_ref, &file.sha256)?;

        let entry = build_entry(
            slot.next_audit_id(),
            evidence_id,
            actor.id,
            AuditAction::FileDownloaded,
            json!({
                "file_id": file.id,
                "filename": file.orig_filename,
            }),
            utc_now_second(),
            slot.tail_hash(),
        )?;
        slot.audit.push(entry);

        tracing::info!(evidence_id = %evidence_id, file_id = %file_id, actor = %actor.id, "evidence file downloaded");
        Ok(FileContents {
            file_id: file.id,
            orig_filename: file.orig_filename,
            mime: file.mime,
            bytes,
        })
    }

    // ── Transfers ────────────────────────────────────────────────────

    /// Open a transfer request. Current custodian only; at most one
    /// pending transfer per item.
    pub fn request_transfer(
        &self,
        actor: &Actor,
        evidence_id: EvidenceId,
        to_user: UserId,
        reason: &str,
    ) -> Result<Transfer, EngineError> {
        require_text("reason", reason)?;

        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let mut slot = slot_arc.lock();

        self.ensure_custodian(actor, &slot, "request transfer")?;
        if slot.transfers.pending().is_some() {
            return Err(coc_custody::CustodyError::PendingTransferExists { evidence_id }.into());
        }

        let now = utc_now_second();
        let transfer = Transfer::request(evidence_id, actor.id, to_user, reason.trim(), now);
        let entry = build_entry(
            slot.next_audit_id(),
            evidence_id,
            actor.id,
            AuditAction::TransferRequested,
            json!({
                "transfer_id": transfer.id,
                "from_user": transfer.from_user,
                "to_user": transfer.to_user,
                "reason": transfer.reason,
            }),
            now,
            slot.tail_hash(),
        )?;

        let committed = slot.transfers.record(transfer)?.clone();
        slot.audit.push(entry);
        self.store.index_transfer(committed.id, evidence_id);

        tracing::info!(evidence_id = %evidence_id, transfer_id = %committed.id, to_user = %to_user, "transfer requested");
        Ok(committed)
    }

    /// Accept a pending transfer. Recipient only. Moves custody and
    /// stamps the acceptance, atomically with the audit entry.
    pub fn accept_transfer(
        &self,
        actor: &Actor,
        transfer_id: TransferId,
    ) -> Result<Transfer, EngineError> {
        self.resolve_transfer(transfer_id, |slot, transfer| {
            let now = utc_now_second();
            let mut updated = transfer.clone();
            updated.accept(actor.id, now)?;

            let entry = build_entry(
                slot.next_audit_id(),
                updated.evidence_id,
                actor.id,
                AuditAction::TransferAccepted,
                json!({
                    "transfer_id": updated.id,
                    "from_user": updated.from_user,
                    "to_user": updated.to_user,
                    "reason": updated.reason,
                }),
                now,
                slot.tail_hash(),
            )?;

            *slot
                .transfers
                .get_mut(transfer_id)
                .expect("transfer present under slot lock") = updated.clone();
            slot.custody.transfer_to(updated.to_user, now);
            slot.audit.push(entry);

            tracing::info!(transfer_id = %transfer_id, new_holder = %updated.to_user, "transfer accepted");
            Ok(updated)
        })
    }

    /// Cancel a pending transfer. Initiator only. Custody untouched.
    pub fn cancel_transfer(
        &self,
        actor: &Actor,
        transfer_id: TransferId,
    ) -> Result<Transfer, EngineError> {
        self.resolve_transfer(transfer_id, |slot, transfer| {
            let mut updated = transfer.clone();
            updated.cancel(actor.id)?;

            let entry = build_entry(
                slot.next_audit_id(),
                updated.evidence_id,
                actor.id,
                AuditAction::TransferCancelled,
                json!({
                    "transfer_id": updated.id,
                    "from_user": updated.from_user,
                    "to_user": updated.to_user,
                    "reason": updated.reason,
                }),
                utc_now_second(),
                slot.tail_hash(),
            )?;

            *slot
                .transfers
                .get_mut(transfer_id)
                .expect("transfer present under slot lock") = updated.clone();
            slot.audit.push(entry);

            tracing::info!(transfer_id = %transfer_id, "transfer cancelled");
            Ok(updated)
        })
    }

    /// Reject a pending transfer. Recipient only. Custody untouched.
    pub fn reject_transfer(
        &self,
        actor: &Actor,
        transfer_id: TransferId,
    ) -> Result<Transfer, EngineError> {
        self.resolve_transfer(transfer_id, |slot, transfer| {
            let mut updated = transfer.clone();
            updated.reject(actor.id)?;

            let entry = build_entry(
                slot.next_audit_id(),
                updated.evidence_id,
                actor.id,
                AuditAction::TransferRejected,
                json!({
                    "transfer_id": updated.id,
                    "from_user": updated.from_user,
                    "to_user": updated.to_user,
                    "reason": updated.reason,
                }),
                utc_now_second(),
                slot.tail_hash(),
            )?;

            *slot
                .transfers
                .get_mut(transfer_id)
                .expect("transfer present under slot lock") = updated.clone();
            slot.audit.push(entry);

            tracing::info!(transfer_id = %transfer_id, "transfer rejected");
            Ok(updated)
        })
    }

    /// Pending transfers addressed to a user, oldest first.
    pub fn list_pending_for(&self, user_id: UserId) -> Vec<Transfer> {
        self.collect_pending(|t| t.to_user == user_id)
    }

    /// Pending transfers initiated by a user, oldest first.
    pub fn list_outgoing_pending_for(&self, user_id: UserId) -> Vec<Transfer> {
        self.collect_pending(|t| t.from_user == user_id)
    }

    // ── Analyses ─────────────────────────────────────────────────────

    /// Record an analysis against an evidence item. Current custodian
    /// only; files are optional but validated like evidence files.
    pub fn create_analysis(
        &self,
        actor: &Actor,
        evidence_id: EvidenceId,
        new: NewAnalysis,
        files: Vec<FileUpload>,
    ) -> Result<AnalysisRecord, EngineError> {
        validate_uploads(&self.config, &files)?;
        require_text("analysis_by", &new.analysis_by)?;
        require_text("description", &new.description)?;

        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let mut slot = slot_arc.lock();

        self.ensure_custodian(actor, &slot, "create analysis")?;

        let now = utc_now_second();
        let analysis_id = AnalysisId::new();
        let mut stored_files = Vec::with_capacity(files.len());
        let mut file_details = Vec::with_capacity(files.len());
        for upload in &files {
            let stored = self.cipher.store(&upload.bytes)?;
            file_details.push(json!({
                "filename": upload.filename,
                "mime": upload.mime,
                "size_bytes": stored.size_bytes,
                "sha256": stored.digest.to_hex(),
            }));
            stored_files.push(AnalysisFile {
                id: FileId::new(),
                analysis_id,
                orig_filename: upload.filename.clone(),
                mime: upload.mime.clone(),
                size_bytes: stored.size_bytes as u64,
                sha256: stored.digest,
                blob_ref: stored.blob_ref,
                created_at_utc: now,
            });
        }

        let analysis = Analysis {
            id: analysis_id,
            evidence_id,
            analysis_at_utc: new.analysis_at_utc,
            analysis_by: new.analysis_by,
            role: new.role,
            place_of_analysis: new.place_of_analysis,
            description: new.description,
            created_by: actor.id,
            created_at_utc: now,
        };

        let entry = build_entry(
            slot.next_audit_id(),
            evidence_id,
            actor.id,
            AuditAction::AnalysisCreated,
            json!({
                "analysis_id": analysis_id,
                "analysis_by": analysis.analysis_by,
                "files": file_details,
            }),
            now,
            slot.tail_hash(),
        )?;

        let record = AnalysisRecord {
            analysis: analysis.clone(),
            files: stored_files.clone(),
        };
        slot.analyses.push(analysis);
        slot.analysis_files.extend(stored_files);
        slot.audit.push(entry);

        tracing::info!(evidence_id = %evidence_id, analysis_id = %analysis_id, actor = %actor.id, "analysis created");
        Ok(record)
    }

    /// List analyses for an evidence item, oldest first. Same visibility
    /// as the item itself.
    pub fn list_analyses(
        &self,
        actor: &Actor,
        evidence_id: EvidenceId,
    ) -> Result<Vec<AnalysisRecord>, EngineError> {
        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let slot = slot_arc.lock();

        if !can_perform(actor, EvidenceAction::ViewEvidence, &resource_view(&slot)) {
            return Err(EngineError::ViewDenied {
                user_id: actor.id,
                evidence_id,
            });
        }

        Ok(slot
            .analyses
            .iter()
            .map(|analysis| AnalysisRecord {
                analysis: analysis.clone(),
                files: slot
                    .analysis_files
                    .iter()
                    .filter(|f| f.analysis_id == analysis.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    /// Decrypt and release an analysis file to the current custodian.
    pub fn download_analysis_file(
        &self,
        actor: &Actor,
        evidence_id: EvidenceId,
        analysis_id: AnalysisId,
        file_id: FileId,
    ) -> Result<FileContents, EngineError> {
        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let mut slot = slot_arc.lock();

        if !slot.analyses.iter().any(|a| a.id == analysis_id) {
            return Err(EngineError::AnalysisNotFound(analysis_id));
        }
        let file = slot
            .analysis_files
            .iter()
            .find(|f| f.id == file_id && f.analysis_id == analysis_id)
            .cloned()
            .ok_or(EngineError::FileNotFound(file_id))?;

        self.ensure_custodian(actor, &slot, "download analysis file")?;

        let bytes = self.cipher.retrieve_verified(&file.blob_ref, &file.sha256)?;

        let entry = build_entry(
            slot.next_audit_id(),
            evidence_id,
            actor.id,
            AuditAction::FileDownloaded,
            json!({
                "analysis_id": analysis_id,
                "file_id": file.id,
                "filename": file.orig_filename,
            }),
            utc_now_second(),
            slot.tail_hash(),
        )?;
        slot.audit.push(entry);

        tracing::info!(evidence_id = %evidence_id, analysis_id = %analysis_id, file_id = %file_id, "analysis file downloaded");
        Ok(FileContents {
            file_id: file.id,
            orig_filename: file.orig_filename,
            mime: file.mime,
            bytes,
        })
    }

    // ── Audit chain ──────────────────────────────────────────────────

    /// The full audit chain of an evidence item, in insertion order.
    /// Open to any authenticated caller.
    pub fn get_audit_log(&self, evidence_id: EvidenceId) -> Result<Vec<AuditEntry>, EngineError> {
        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let slot = slot_arc.lock();
        Ok(slot.audit.clone())
    }

    /// Walk and verify an evidence item's audit chain.
    pub fn verify_audit_chain(&self, evidence_id: EvidenceId) -> Result<ChainReport, EngineError> {
        let entries = self.get_audit_log(evidence_id)?;
        let report = verify_chain(&entries);
        if !report.valid {
            tracing::error!(evidence_id = %evidence_id, "audit chain verification failed");
        }
        Ok(report)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn ensure_custodian(
        &self,
        actor: &Actor,
        slot: &EvidenceSlot,
        action: &'static str,
    ) -> Result<(), EngineError> {
        if !slot.custody.is_held_by(actor.id) {
            tracing::warn!(actor = %actor.id, evidence_id = %slot.item.id, action, "custodian check failed");
            return Err(coc_custody::CustodyError::NotCustodian {
                user_id: actor.id,
                evidence_id: slot.item.id,
            }
            .into());
        }
        Ok(())
    }

    fn resolve_transfer<T>(
        &self,
        transfer_id: TransferId,
        apply: impl FnOnce(&mut EvidenceSlot, &Transfer) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let evidence_id = self
            .store
            .evidence_for_transfer(transfer_id)
            .ok_or(EngineError::TransferNotFound(transfer_id))?;
        let slot_arc = self
            .store
            .slot(evidence_id)
            .ok_or(EngineError::EvidenceNotFound(evidence_id))?;
        let mut slot = slot_arc.lock();

        let transfer = slot
            .transfers
            .get(transfer_id)
            .cloned()
            .ok_or(EngineError::TransferNotFound(transfer_id))?;
        apply(&mut slot, &transfer)
    }

    fn collect_pending(&self, matches: impl Fn(&Transfer) -> bool) -> Vec<Transfer> {
        let mut transfers: Vec<Transfer> = self
            .store
            .all_slots()
            .iter()
            .filter_map(|slot_arc| {
                let slot = slot_arc.lock();
                slot.transfers.pending().filter(|t| matches(t)).cloned()
            })
            .collect();
        transfers.sort_by(|a, b| a.requested_at_utc.cmp(&b.requested_at_utc));
        transfers
    }
}

impl std::fmt::Debug for CustodyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustodyEngine")
            .field("blob_dir", &self.cipher.base_dir())
            .finish_non_exhaustive()
    }
}

/// Build the policy view of a slot.
fn resource_view(slot: &EvidenceSlot) -> ResourceView {
    ResourceView {
        created_by: Some(slot.item.collected_by),
        custodian: Some(slot.custody.holder_id()),
    }
}

/// Snapshot a slot into its read model.
fn record_from(slot: &EvidenceSlot) -> EvidenceRecord {
    EvidenceRecord {
        item: slot.item.clone(),
        custodian_id: slot.custody.holder_id(),
        custody_since_utc: slot.custody.since_utc(),
        files: slot.files.clone(),
    }
}
