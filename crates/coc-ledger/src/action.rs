//! # Audit Action Taxonomy
//!
//! The closed set of auditable domain actions. Serialized as the
//! screaming-snake tag strings that appear inside entry payloads — the
//! rendering is part of the frozen hash input.

use serde::{Deserialize, Serialize};

/// An auditable domain action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Evidence item registered; genesis entry of its chain.
    #[serde(rename = "EVIDENCE_CREATED")]
    EvidenceCreated,
    /// Current custodian requested a transfer.
    #[serde(rename = "TRANSFER_REQUESTED")]
    TransferRequested,
    /// Recipient accepted a pending transfer; custody moved.
    #[serde(rename = "TRANSFER_ACCEPTED")]
    TransferAccepted,
    /// Initiator cancelled a pending transfer.
    #[serde(rename = "TRANSFER_CANCELLED")]
    TransferCancelled,
    /// Recipient rejected a pending transfer.
    #[serde(rename = "TRANSFER_REJECTED")]
    TransferRejected,
    /// Custodian decrypted and downloaded a file.
    #[serde(rename = "FILE_DOWNLOADED")]
    FileDownloaded,
    /// Custodian recorded an analysis.
    #[serde(rename = "ANALYSIS_CREATED")]
    AnalysisCreated,
}

impl AuditAction {
    /// The canonical tag string of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EvidenceCreated => "EVIDENCE_CREATED",
            Self::TransferRequested => "TRANSFER_REQUESTED",
            Self::TransferAccepted => "TRANSFER_ACCEPTED",
            Self::TransferCancelled => "TRANSFER_CANCELLED",
            Self::TransferRejected => "TRANSFER_REJECTED",
            Self::FileDownloaded => "FILE_DOWNLOADED",
            Self::AnalysisCreated => "ANALYSIS_CREATED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EVIDENCE_CREATED" => Ok(Self::EvidenceCreated),
            "TRANSFER_REQUESTED" => Ok(Self::TransferRequested),
            "TRANSFER_ACCEPTED" => Ok(Self::TransferAccepted),
            "TRANSFER_CANCELLED" => Ok(Self::TransferCancelled),
            "TRANSFER_REJECTED" => Ok(Self::TransferRejected),
            "FILE_DOWNLOADED" => Ok(Self::FileDownloaded),
            "ANALYSIS_CREATED" => Ok(Self::AnalysisCreated),
            other => Err(format!("unknown audit action: {other}")),
        }
    }
}
