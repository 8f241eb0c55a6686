//! # Custody Error Types
//!
//! Each variant carries the actor and resource context needed to
//! diagnose a rejected transition without consulting logs.

use thiserror::Error;

use coc_core::{EvidenceId, TransferId, UserId};

use crate::transfer::TransferStatus;

/// Errors from custody and transfer transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// The acting user does not currently hold the evidence item.
    #[error("user {user_id} is not the current custodian of evidence {evidence_id}")]
    NotCustodian {
        /// The acting user.
        user_id: UserId,
        /// The evidence item.
        evidence_id: EvidenceId,
    },

    /// The acting user is not the transfer's recipient.
    #[error("user {user_id} is not the recipient of transfer {transfer_id}")]
    NotRecipient {
        /// The acting user.
        user_id: UserId,
        /// The transfer.
        transfer_id: TransferId,
    },

    /// The acting user is not the transfer's initiator.
    #[error("user {user_id} is not the initiator of transfer {transfer_id}")]
    NotInitiator {
        /// The acting user.
        user_id: UserId,
        /// The transfer.
        transfer_id: TransferId,
    },

    /// The transfer is not in the PENDING state.
    #[error("transfer {transfer_id} is not pending (status: {status})")]
    NotPending {
        /// The transfer.
        transfer_id: TransferId,
        /// Its current (terminal) status.
        status: TransferStatus,
    },

    /// A PENDING transfer already exists for the evidence item.
    #[error("a pending transfer already exists for evidence {evidence_id}")]
    PendingTransferExists {
        /// The evidence item.
        evidence_id: EvidenceId,
    },
}
