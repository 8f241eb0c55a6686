//! # Custody Records
//!
//! One [`Custody`] record per evidence item, created when the item is
//! registered (holder = creator) and never deleted. The holder identity
//! is private: it can only change through [`Custody::transfer_to`],
//! which the engine calls exclusively from an accepted transfer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coc_core::{EvidenceId, UserId};

/// The single active custody record of an evidence item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Custody {
    evidence_id: EvidenceId,
    holder_id: UserId,
    since_utc: DateTime<Utc>,
}

impl Custody {
    /// Grant initial custody at evidence creation.
    pub fn grant(evidence_id: EvidenceId, holder_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            evidence_id,
            holder_id,
            since_utc: now,
        }
    }

    /// The evidence item this record belongs to.
    pub fn evidence_id(&self) -> EvidenceId {
        self.evidence_id
    }

    /// The current holder.
    pub fn holder_id(&self) -> UserId {
        self.holder_id
    }

    /// When the current holder took possession.
    pub fn since_utc(&self) -> DateTime<Utc> {
        self.since_utc
    }

    /// Whether the given user currently holds the item.
    pub fn is_held_by(&self, user_id: UserId) -> bool {
        self.holder_id == user_id
    }

    /// Move custody to a new holder.
    ///
    /// Only called by the engine while committing an accepted transfer;
    /// there is no other path that mutates the holder.
    pub fn transfer_to(&mut self, to: UserId, now: DateTime<Utc>) {
        self.holder_id = to;
        self.since_utc = now;
    }
}
