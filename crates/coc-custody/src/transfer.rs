//! # Transfer Lifecycle
//!
//! A transfer moves custody from its initiator to its recipient:
//!
//! ```text
//! PENDING ──accept (recipient)──▶ ACCEPTED   (custody moves)
//!    │
//!    ├────cancel (initiator)────▶ CANCELLED  (custody untouched)
//!    └────reject (recipient)────▶ CANCELLED  (custody untouched)
//! ```
//!
//! ACCEPTED and CANCELLED are terminal; any further transition attempt is
//! a [`CustodyError::NotPending`]. No wildcard matches are used in the
//! transition logic, so adding a status variant forces a compiler error
//! at every decision point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coc_core::{EvidenceId, TransferId, UserId};

use crate::error::CustodyError;

/// Status of a transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferStatus {
    /// Awaiting the recipient's decision.
    #[serde(rename = "PENDING")]
    Pending,
    /// Recipient accepted; custody moved. Terminal.
    #[serde(rename = "ACCEPTED")]
    Accepted,
    /// Initiator cancelled or recipient rejected. Terminal.
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl TransferStatus {
    /// Whether this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Pending => false,
            Self::Accepted | Self::Cancelled => true,
        }
    }

    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to move custody of one evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique transfer identifier.
    pub id: TransferId,
    /// The evidence item being moved.
    pub evidence_id: EvidenceId,
    /// The initiating (current) custodian.
    pub from_user: UserId,
    /// The proposed new custodian.
    pub to_user: UserId,
    /// Free-text justification.
    pub reason: String,
    /// Current lifecycle status.
    status: TransferStatus,
    /// When the request was made.
    pub requested_at_utc: DateTime<Utc>,
    /// When the request was accepted, if it was.
    pub accepted_at_utc: Option<DateTime<Utc>>,
}

impl Transfer {
    /// Create a new PENDING transfer request.
    pub fn request(
        evidence_id: EvidenceId,
        from_user: UserId,
        to_user: UserId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransferId::new(),
            evidence_id,
            from_user,
            to_user,
            reason: reason.into(),
            status: TransferStatus::Pending,
            requested_at_utc: now,
            accepted_at_utc: None,
        }
    }

    /// Current status.
    pub fn status(&self) -> TransferStatus {
        self.status
    }

    /// Whether the transfer is still awaiting a decision.
    pub fn is_pending(&self) -> bool {
        self.status == TransferStatus::Pending
    }

    fn ensure_pending(&self) -> Result<(), CustodyError> {
        match self.status {
            TransferStatus::Pending => Ok(()),
            TransferStatus::Accepted | TransferStatus::Cancelled => {
                Err(CustodyError::NotPending {
                    transfer_id: self.id,
                    status: self.status,
                })
            }
        }
    }

    /// Accept the transfer. Recipient only; PENDING only.
    ///
    /// The caller moves custody in the same atomic unit.
    pub fn accept(&mut self, actor: UserId, now: DateTime<Utc>) -> Result<(), CustodyError> {
        if actor != self.to_user {
            return Err(CustodyError::NotRecipient {
                user_id: actor,
                transfer_id: self.id,
            });
        }
        self.ensure_pending()?;
        self.status = TransferStatus::Accepted;
        self.accepted_at_utc = Some(now);
        Ok(())
    }

    /// Cancel the transfer. Initiator only; PENDING only. Custody is
    /// untouched.
    pub fn cancel(&mut self, actor: UserId) -> Result<(), CustodyError> {
        if actor != self.from_user {
            return Err(CustodyError::NotInitiator {
                user_id: actor,
                transfer_id: self.id,
            });
        }
        self.ensure_pending()?;
        self.status = TransferStatus::Cancelled;
        Ok(())
    }

    /// Reject the transfer. Recipient only; PENDING only. Custody is
    /// untouched.
    pub fn reject(&mut self, actor: UserId) -> Result<(), CustodyError> {
        if actor != self.to_user {
            return Err(CustodyError::NotRecipient {
                user_id: actor,
                transfer_id: self.id,
            });
        }
        self.ensure_pending()?;
        self.status = TransferStatus::Cancelled;
        Ok(())
    }
}

/// The transfer history of one evidence item.
///
/// Append-only: terminal transfers are never removed. The log enforces
/// the at-most-one-pending invariant on open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLog {
    transfers: Vec<Transfer>,
}

impl TransferLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All transfers, oldest first.
    pub fn all(&self) -> &[Transfer] {
        &self.transfers
    }

    /// The currently pending transfer, if any.
    pub fn pending(&self) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.is_pending())
    }

    /// Look up a transfer by id.
    pub fn get(&self, id: TransferId) -> Option<&Transfer> {
        self.transfers.iter().find(|t| t.id == id)
    }

    /// Look up a transfer by id, mutably.
    pub fn get_mut(&mut self, id: TransferId) -> Option<&mut Transfer> {
        self.transfers.iter_mut().find(|t| t.id == id)
    }

    /// Append a transfer, enforcing at-most-one-pending.
    ///
    /// No row is created on conflict. Callers that must interleave other
    /// fallible work between constructing the transfer and committing it
    /// (the engine builds the audit entry in between) construct via
    /// [`Transfer::request`] and commit here.
    pub fn record(&mut self, transfer: Transfer) -> Result<&Transfer, CustodyError> {
        if transfer.is_pending() && self.pending().is_some() {
            return Err(CustodyError::PendingTransferExists {
                evidence_id: transfer.evidence_id,
            });
        }
        self.transfers.push(transfer);
        Ok(self
            .transfers
            .last()
            .expect("just pushed a transfer onto the log"))
    }

    /// Open a new PENDING transfer, enforcing at-most-one-pending.
    pub fn open_transfer(
        &mut self,
        evidence_id: EvidenceId,
        from_user: UserId,
        to_user: UserId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&Transfer, CustodyError> {
        self.record(Transfer::request(evidence_id, from_user, to_user, reason, now))
    }
}
