//! # Evidence/Analysis Catalog
//!
//! The entity records the engine stores and the input types callers hand
//! it. All records are immutable once created — the registry has no
//! update or delete operations, consistent with the ledger's append-only
//! discipline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coc_core::{
    AnalysisId, ContentDigest, EngineConfig, EvidenceId, EvidenceTag, FileId, UserId,
};
use coc_crypto::BlobRef;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// An evidence item's immutable business record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    /// Internal identifier.
    pub id: EvidenceId,
    /// Composite business key `{agency}-{case_no}-{item_no}`.
    pub tag: EvidenceTag,
    /// Collecting agency.
    pub agency: String,
    /// Case number, globally unique.
    pub case_no: String,
    /// Offense description.
    pub offense: String,
    /// Item number within the case.
    pub item_no: String,
    /// Badge number of the collecting officer.
    pub badge_no: String,
    /// Where the item was collected.
    pub location: String,
    /// Free-text description.
    pub description: String,
    /// Who registered the item (initial custodian).
    pub collected_by: UserId,
    /// When the item was physically collected.
    pub collected_at_utc: DateTime<Utc>,
    /// When the record was created.
    pub created_at_utc: DateTime<Utc>,
}

/// Metadata of one encrypted evidence file attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceFile {
    /// File identifier.
    pub id: FileId,
    /// Owning evidence item.
    pub evidence_id: EvidenceId,
    /// Original upload filename (display only; never a storage path).
    pub orig_filename: String,
    /// Declared MIME type (validated against the allow-list).
    pub mime: String,
    /// Plaintext size in bytes.
    pub size_bytes: u64,
    /// SHA-256 digest of the plaintext, recorded at store time.
    pub sha256: ContentDigest,
    /// Opaque reference into the cipher store.
    pub blob_ref: BlobRef,
    /// When the file was stored.
    pub created_at_utc: DateTime<Utc>,
}

/// A dated examination record tied to one evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Analysis identifier.
    pub id: AnalysisId,
    /// The examined evidence item.
    pub evidence_id: EvidenceId,
    /// When the examination took place.
    pub analysis_at_utc: DateTime<Utc>,
    /// Who performed it (free text; may be an external examiner).
    pub analysis_by: String,
    /// The examiner's stated role or title.
    pub role: String,
    /// Where the examination took place.
    pub place_of_analysis: String,
    /// Findings description.
    pub description: String,
    /// The custodian who recorded the analysis.
    pub created_by: UserId,
    /// When the record was created.
    pub created_at_utc: DateTime<Utc>,
}

/// Metadata of one encrypted analysis file attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFile {
    /// File identifier.
    pub id: FileId,
    /// Owning analysis record.
    pub analysis_id: AnalysisId,
    /// Original upload filename (display only; never a storage path).
    pub orig_filename: String,
    /// Declared MIME type (validated against the allow-list).
    pub mime: String,
    /// Plaintext size in bytes.
    pub size_bytes: u64,
    /// SHA-256 digest of the plaintext, recorded at store time.
    pub sha256: ContentDigest,
    /// Opaque reference into the cipher store.
    pub blob_ref: BlobRef,
    /// When the file was stored.
    pub created_at_utc: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Read models
// ---------------------------------------------------------------------------

/// An evidence item with its custody snapshot and file listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// The immutable item record.
    pub item: EvidenceItem,
    /// The current custodian.
    pub custodian_id: UserId,
    /// Since when they hold it.
    pub custody_since_utc: DateTime<Utc>,
    /// Attached file metadata (no payloads).
    pub files: Vec<EvidenceFile>,
}

/// An analysis with its file listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// The immutable analysis record.
    pub analysis: Analysis,
    /// Attached file metadata (no payloads).
    pub files: Vec<AnalysisFile>,
}

/// A decrypted, digest-verified file payload released to the custodian.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContents {
    /// The file's identifier.
    pub file_id: FileId,
    /// Original filename for the download response.
    pub orig_filename: String,
    /// MIME type for the download response.
    pub mime: String,
    /// The verified plaintext.
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input for registering a new evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvidence {
    /// Collecting agency.
    pub agency: String,
    /// Case number, globally unique.
    pub case_no: String,
    /// Offense description.
    pub offense: String,
    /// Item number within the case.
    pub item_no: String,
    /// Badge number of the collecting officer.
    pub badge_no: String,
    /// Where the item was collected.
    pub location: String,
    /// When the item was physically collected.
    pub collected_at_utc: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

/// Input for recording a new analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnalysis {
    /// When the examination took place.
    pub analysis_at_utc: DateTime<Utc>,
    /// Who performed it.
    pub analysis_by: String,
    /// The examiner's stated role or title.
    pub role: String,
    /// Where the examination took place.
    pub place_of_analysis: String,
    /// Findings description.
    pub description: String,
}

/// One uploaded file: metadata plus plaintext payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    /// Original filename (display only).
    pub filename: String,
    /// Declared MIME type.
    pub mime: String,
    /// The plaintext payload.
    pub bytes: Vec<u8>,
}

/// Validate uploads against the configured MIME allow-list and size cap.
///
/// Rejects before anything is encrypted or persisted; nothing is
/// partially committed on failure.
pub(crate) fn validate_uploads(
    config: &EngineConfig,
    files: &[FileUpload],
) -> Result<(), EngineError> {
    for file in files {
        if !config.is_mime_allowed(&file.mime) {
            return Err(EngineError::Validation(format!(
                "file type {} not allowed",
                file.mime
            )));
        }
        if file.bytes.len() > config.max_file_size() {
            return Err(EngineError::Validation(format!(
                "file {} exceeds maximum size of {} bytes",
                file.filename,
                config.max_file_size()
            )));
        }
    }
    Ok(())
}

/// Validate that a free-text field is present.
pub(crate) fn require_text(label: &str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(())
}
