//! # Engine Error Types
//!
//! Structured errors for every engine operation, each mapped onto one of
//! the five failure classes via [`EngineError::kind`]. The transport
//! layer translates kinds to its own status codes; integrity faults are
//! kept distinct from ordinary not-found/conflict failures because they
//! imply tampering or corruption, not caller error.

use thiserror::Error;

use coc_core::{AnalysisId, EvidenceId, EvidenceTag, FileId, Role, TransferId, UserId};
use coc_crypto::CryptoError;
use coc_custody::CustodyError;
use coc_ledger::LedgerError;

/// The failure class of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input; rejected before any mutation.
    Validation,
    /// Caller lacks the right to perform the operation; no side effects.
    Authorization,
    /// Input clashes with current state; caller may retry corrected.
    Conflict,
    /// Referenced resource does not exist.
    NotFound,
    /// Tampering or corruption detected; never silently recovered.
    Integrity,
}

/// Errors from engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or disallowed input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The case number is already registered to another evidence item.
    #[error("case number {case_no} is already registered")]
    DuplicateCase {
        /// The conflicting case number.
        case_no: String,
    },

    /// The composite evidence tag already exists.
    #[error("evidence tag {tag} already exists")]
    DuplicateEvidence {
        /// The conflicting tag.
        tag: EvidenceTag,
    },

    /// The caller's role does not permit the operation.
    #[error("role {role} may not {action}")]
    RoleForbidden {
        /// The caller's role.
        role: Role,
        /// The denied operation.
        action: &'static str,
    },

    /// The caller may not view the evidence item.
    #[error("user {user_id} may not view evidence {evidence_id}")]
    ViewDenied {
        /// The denied caller.
        user_id: UserId,
        /// The evidence item.
        evidence_id: EvidenceId,
    },

    /// A custody or transfer transition was rejected.
    #[error(transparent)]
    Custody(#[from] CustodyError),

    /// Evidence item not found.
    #[error("evidence {0} not found")]
    EvidenceNotFound(EvidenceId),

    /// File not found on the referenced evidence item or analysis.
    #[error("file {0} not found")]
    FileNotFound(FileId),

    /// Transfer not found.
    #[error("transfer {0} not found")]
    TransferNotFound(TransferId),

    /// Analysis not found.
    #[error("analysis {0} not found")]
    AnalysisNotFound(AnalysisId),

    /// A referenced encrypted blob is missing from the blob directory.
    #[error("stored file is missing: {0}")]
    BlobNotFound(String),

    /// Tampering or corruption detected in stored data.
    ///
    /// The display string is deliberately generic; the underlying cause
    /// is logged, not surfaced.
    #[error("corruption detected")]
    Integrity(#[source] CryptoError),

    /// Audit entry construction failed (non-canonical payload).
    #[error("audit entry rejected: {0}")]
    Ledger(#[from] LedgerError),
}

impl EngineError {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Ledger(_) => ErrorKind::Validation,
            Self::DuplicateCase { .. } | Self::DuplicateEvidence { .. } => ErrorKind::Conflict,
            Self::RoleForbidden { .. } | Self::ViewDenied { .. } => ErrorKind::Authorization,
            Self::Custody(err) => match err {
                CustodyError::NotCustodian { .. }
                | CustodyError::NotRecipient { .. }
                | CustodyError::NotInitiator { .. } => ErrorKind::Authorization,
                CustodyError::NotPending { .. } | CustodyError::PendingTransferExists { .. } => {
                    ErrorKind::Conflict
                }
            },
            Self::EvidenceNotFound(_)
            | Self::FileNotFound(_)
            | Self::TransferNotFound(_)
            | Self::AnalysisNotFound(_)
            | Self::BlobNotFound(_) => ErrorKind::NotFound,
            Self::Integrity(_) => ErrorKind::Integrity,
        }
    }
}

impl From<CryptoError> for EngineError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::NotFound(blob_ref) => Self::BlobNotFound(blob_ref),
            other => Self::Integrity(other),
        }
    }
}

impl From<coc_core::ValidationError> for EngineError {
    fn from(err: coc_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coc_custody::TransferStatus;

    #[test]
    fn validation_kind() {
        assert_eq!(
            EngineError::Validation("bad mime".into()).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn duplicate_case_is_conflict() {
        let err = EngineError::DuplicateCase {
            case_no: "CASE1".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(format!("{err}").contains("CASE1"));
    }

    #[test]
    fn duplicate_evidence_is_conflict() {
        let err = EngineError::DuplicateEvidence {
            tag: EvidenceTag::compose("FBI", "CASE1", "001").unwrap(),
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn role_and_view_denials_are_authorization() {
        let err = EngineError::RoleForbidden {
            role: Role::Auditor,
            action: "create evidence",
        };
        assert_eq!(err.kind(), ErrorKind::Authorization);

        let err = EngineError::ViewDenied {
            user_id: UserId::new(),
            evidence_id: EvidenceId::new(),
        };
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn custody_actor_errors_are_authorization() {
        for err in [
            CustodyError::NotCustodian {
                user_id: UserId::new(),
                evidence_id: EvidenceId::new(),
            },
            CustodyError::NotRecipient {
                user_id: UserId::new(),
                transfer_id: TransferId::new(),
            },
            CustodyError::NotInitiator {
                user_id: UserId::new(),
                transfer_id: TransferId::new(),
            },
        ] {
            assert_eq!(EngineError::from(err).kind(), ErrorKind::Authorization);
        }
    }

    #[test]
    fn custody_state_errors_are_conflict() {
        for err in [
            CustodyError::NotPending {
                transfer_id: TransferId::new(),
                status: TransferStatus::Accepted,
            },
            CustodyError::PendingTransferExists {
                evidence_id: EvidenceId::new(),
            },
        ] {
            assert_eq!(EngineError::from(err).kind(), ErrorKind::Conflict);
        }
    }

    #[test]
    fn not_found_kinds() {
        assert_eq!(
            EngineError::EvidenceNotFound(EvidenceId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::FileNotFound(FileId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::TransferNotFound(TransferId::new()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            EngineError::BlobNotFound("x.bin".into()).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn crypto_integrity_maps_to_integrity() {
        let err = EngineError::from(CryptoError::Integrity("tag".into()));
        assert_eq!(err.kind(), ErrorKind::Integrity);
        // Generic display: no internal cause leaked.
        assert_eq!(format!("{err}"), "corruption detected");
    }

    #[test]
    fn crypto_not_found_maps_to_not_found() {
        let err = EngineError::from(CryptoError::NotFound("gone.bin".into()));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn core_validation_maps_to_validation() {
        let err =
            EngineError::from(coc_core::ValidationError::InvalidTimestamp("x".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
