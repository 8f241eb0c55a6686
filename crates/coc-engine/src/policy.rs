//! # Access Policy
//!
//! The single decision point for "may this actor do this to this
//! resource". Call sites never re-derive role rules; they build a
//! [`ResourceView`] from the state they hold and ask [`can_perform`].
//! The function is pure and testable without a store or transport.
//!
//! ## Rules
//!
//! | action            | rule                                            |
//! |-------------------|-------------------------------------------------|
//! | CreateEvidence    | role ∈ {COLLECTOR, ANALYST, ADMIN}              |
//! | ViewEvidence      | AUDITOR, or creator, or current custodian       |
//! | DownloadFile      | current custodian only                          |
//! | RequestTransfer   | current custodian only                          |
//! | CreateAnalysis    | current custodian only                          |
//! | ReadAuditLog      | any authenticated caller                        |
//!
//! ADMIN deliberately does NOT get auditor-wide visibility: outside of
//! creating evidence it behaves like a regular user.

use coc_core::{Actor, Role, UserId};

/// An engine operation subject to policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceAction {
    /// Register a new evidence item.
    CreateEvidence,
    /// Read an evidence item's metadata and file listing.
    ViewEvidence,
    /// Decrypt and download an attached file.
    DownloadFile,
    /// Open a custody transfer request.
    RequestTransfer,
    /// Record an analysis against an evidence item.
    CreateAnalysis,
    /// Read or verify the audit chain.
    ReadAuditLog,
}

/// The slice of resource state policy decisions depend on.
///
/// Both fields are `None` for actions that have no resource yet
/// (creation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceView {
    /// Who created the evidence item.
    pub created_by: Option<UserId>,
    /// Who currently holds it.
    pub custodian: Option<UserId>,
}

impl ResourceView {
    /// A view with no resource context (creation-time checks).
    pub fn none() -> Self {
        Self::default()
    }
}

/// Decide whether `actor` may perform `action` against `resource`.
pub fn can_perform(actor: &Actor, action: EvidenceAction, resource: &ResourceView) -> bool {
    match action {
        EvidenceAction::CreateEvidence => matches!(
            actor.role,
            Role::Collector | Role::Analyst | Role::Admin
        ),
        EvidenceAction::ViewEvidence => {
            actor.role == Role::Auditor
                || resource.created_by == Some(actor.id)
                || resource.custodian == Some(actor.id)
        }
        EvidenceAction::DownloadFile
        | EvidenceAction::RequestTransfer
        | EvidenceAction::CreateAnalysis => resource.custodian == Some(actor.id),
        EvidenceAction::ReadAuditLog => true,
    }
}
